/// Builds a [`Registry`](crate::runtime::registry::Registry) from sketch
/// modules. Each module must expose `SKETCH_CONFIG` and an `init()` function
/// returning a fresh sketch instance.
///
/// ```rust,ignore
/// let registry = easel::register_sketches![basic_shapes, bouncing_ball]?;
/// ```
#[macro_export]
macro_rules! register_sketches {
    ($($module:ident),+ $(,)?) => {{
        (|| -> Result<
            $crate::runtime::registry::Registry,
            $crate::runtime::registry::RegistrationError,
        > {
            let mut __registry = $crate::runtime::registry::Registry::new();

            $(
                __registry.register(
                    &$module::SKETCH_CONFIG,
                    || Box::new($module::init()),
                )?;
            )+

            Ok(__registry)
        })()
    }};
}
