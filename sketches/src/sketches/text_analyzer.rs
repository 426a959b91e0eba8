use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig =
    SketchConfig::new("text_analyzer", "Corpus Comedian")
        .description(
            "Word frequency analysis that turns the most common words into \
             knock-knock jokes. D loads the demo text, W toggles the word \
             cloud, J tells a joke.",
        )
        .size(900, 700);

const DEMO_TEXT: &str = "\
Start your morning with a nutritious breakfast. Consider scrambled eggs with \
whole wheat toast and fresh avocado. Eggs are an excellent source of protein. \
For lunch, consider a hearty salad with grilled chicken or salmon. Fresh salad \
greens topped with protein make a balanced meal. Grilled salmon with roasted \
vegetables is an excellent dinner. The salmon provides omega-3 fatty acids \
while the vegetables add fiber. Fresh fruit makes a perfect snack, and fresh \
vegetables with hummus add protein and fiber. Stay hydrated with plenty of \
water and enjoy your meals.";

const TOP_WORDS: usize = 20;
const JOKE_LINES: usize = 5;

/// Word counts for one body of text, most frequent first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Analysis {
    pub total_words: usize,
    pub top: Vec<(String, usize)>,
}

impl Analysis {
    pub fn count(&self, word: &str) -> Option<usize> {
        self.top.iter().find(|(w, _)| w == word).map(|(_, n)| *n)
    }
}

/// Lowercases, strips punctuation and ignores words of two letters or fewer.
/// Ties are broken alphabetically so the ranking is stable.
pub fn analyze(text: &str) -> Analysis {
    const PUNCTUATION: &str = ".,/#!$%^&*;:{}=-_`~()";

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(*c))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::default();
    let mut total_words = 0;
    for word in cleaned.split_whitespace().filter(|w| w.chars().count() > 2) {
        total_words += 1;
        *counts.entry(word).or_default() += 1;
    }

    let mut top: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(TOP_WORDS);

    Analysis { total_words, top }
}

pub fn knock_knock(word: &str, count: usize) -> [String; JOKE_LINES] {
    let mut chars = word.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    [
        "Knock knock!".to_string(),
        "Who's there?".to_string(),
        capitalized.clone(),
        format!("{} who?", capitalized),
        format!("{}... it appears {} times in your text!", capitalized, count),
    ]
}

struct Joke {
    lines: [String; JOKE_LINES],
    shown: usize,
    next_at: u64,
}

struct CloudWord {
    word: String,
    count: usize,
    x: f32,
    y: f32,
    size: f32,
    color: (f32, f32, f32),
}

struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    alpha: f32,
    size: f32,
}

pub struct TextAnalyzer {
    analysis: Option<Analysis>,
    cloud: Vec<CloudWord>,
    show_cloud: bool,
    joke: Option<Joke>,
    particles: Vec<Particle>,
    punchline_phase: f32,
}

pub fn init() -> TextAnalyzer {
    TextAnalyzer {
        analysis: None,
        cloud: Vec::new(),
        show_cloud: false,
        joke: None,
        particles: Vec::new(),
        punchline_phase: 0.0,
    }
}

impl TextAnalyzer {
    fn load(&mut self, text: &str) {
        let analysis = analyze(text);
        info!(
            "analyzed {} words, {} distinct in the top list",
            analysis.total_words,
            analysis.top.len()
        );

        let (min, max) = match (analysis.top.last(), analysis.top.first()) {
            (Some(last), Some(first)) => (last.1 as f32, first.1 as f32),
            _ => (0.0, 0.0),
        };
        self.cloud = analysis
            .top
            .iter()
            .map(|(word, count)| CloudWord {
                word: word.clone(),
                count: *count,
                x: random(200.0, width() - 200.0),
                y: random(250.0, height() - 100.0),
                size: map_range(*count as f32, min, max, 16.0, 60.0),
                color: (
                    random(100.0, 255.0),
                    random(100.0, 255.0),
                    random(150.0, 255.0),
                ),
            })
            .collect();

        self.analysis = Some(analysis);
        self.burst(width() / 2.0, 120.0);
    }

    fn tell_joke(&mut self) {
        let Some(analysis) = self.analysis.as_ref() else {
            warn!("no text loaded; press D for the demo text");
            return;
        };
        if analysis.top.is_empty() {
            return;
        }

        let pick = random(0.0, analysis.top.len().min(10) as f32) as usize;
        let (word, count) = &analysis.top[pick.min(analysis.top.len() - 1)];
        self.joke = Some(Joke {
            lines: knock_knock(word, *count),
            shown: 0,
            next_at: millis() + 800,
        });
        self.show_cloud = false;
        self.punchline_phase = 0.0;
    }

    fn advance_joke(&mut self) {
        let now = millis();
        let Some(joke) = self.joke.as_mut() else {
            return;
        };
        if joke.shown >= JOKE_LINES || now < joke.next_at {
            return;
        }

        joke.shown += 1;
        joke.next_at = now + if joke.shown == 2 { 1200 } else { 1500 };
        self.burst(width() / 2.0, height() / 2.0);
    }

    fn burst(&mut self, x: f32, y: f32) {
        for _ in 0..20 {
            self.particles.push(Particle {
                x,
                y,
                vx: random(-2.0, 2.0),
                vy: random(-3.0, -1.0),
                alpha: 255.0,
                size: random(3.0, 8.0),
            });
        }
    }

    fn draw_particles(&mut self) {
        no_stroke();
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += 0.1;
            p.alpha -= 3.0;
            fill((255.0, 220.0, 150.0, p.alpha.max(0.0)));
            circle(p.x, p.y, p.size);
        }
        self.particles.retain(|p| p.alpha > 0.0);
    }

    fn draw_joke(&self, joke: &Joke) {
        let mut y = 280.0;
        for (i, line) in joke.lines.iter().take(joke.shown).enumerate() {
            push();
            match i {
                0 | 2 => {
                    fill((100.0, 200.0, 255.0));
                    text_size(32.0);
                }
                4 => {
                    fill((255.0, 220.0, 100.0));
                    text_size(28.0 * (1.0 + 0.3 * self.punchline_phase.sin()));
                }
                _ => {
                    fill(255.0);
                    text_size(24.0);
                }
            }
            text(line, width() / 2.0, y);
            y += if i == 4 { 80.0 } else { 60.0 };
            pop();
        }
    }

    fn draw_cloud(&self) {
        fill(255.0);
        text_size(28.0);
        text("Most Frequent Words", width() / 2.0, 180.0);

        for word in &self.cloud {
            fill(word.color);
            text_size(word.size);
            text(&word.word, word.x, word.y);
            fill(200.0);
            text_size(12.0);
            text(
                format!("({})", word.count),
                word.x,
                word.y + word.size / 2.0 + 10.0,
            );
        }
    }
}

impl Sketch for TextAnalyzer {
    fn init(&mut self) -> SketchResult {
        text_align(TextAlign::Center);
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        background((20.0, 24.0, 35.0));
        text_align(TextAlign::Center);

        fill((255.0, 220.0, 100.0));
        text_size(42.0);
        text("Corpus Comedian", width() / 2.0, 40.0);

        if let Some(analysis) = self.analysis.as_ref() {
            fill((150.0, 255.0, 150.0));
            text_size(14.0);
            text(
                format!("Loaded {} words", analysis.total_words),
                width() / 2.0,
                120.0,
            );
        }

        self.advance_joke();
        match self.joke.as_ref() {
            _ if self.show_cloud && !self.cloud.is_empty() => self.draw_cloud(),
            Some(joke) if joke.shown > 0 => self.draw_joke(joke),
            _ if self.analysis.is_none() => {
                fill(200.0);
                text_size(20.0);
                text("Press D to load the demo text", width() / 2.0, 280.0);
            }
            _ => {}
        }

        if self
            .joke
            .as_ref()
            .is_some_and(|joke| joke.shown >= JOKE_LINES)
        {
            self.punchline_phase += 0.05;
        }

        self.draw_particles();
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        let Some(c) = key().and_then(|k| k.as_char()) else {
            return Ok(());
        };

        match c.to_ascii_lowercase() {
            'd' => self.load(DEMO_TEXT),
            'w' => self.show_cloud = !self.show_cloud,
            'j' => self.tell_joke(),
            _ => {}
        }
        Ok(())
    }
}
