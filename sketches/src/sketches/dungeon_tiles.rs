use easel::prelude::*;

pub static SKETCH_CONFIG: SketchConfig =
    SketchConfig::new("dungeon_tiles", "Dungeon Tile Painter")
        .description(
            "Paint a dungeon, then play it. Click or drag to paint, 1-4 or \
             the palette to pick a tile, P to toggle play mode, arrows or \
             WASD to move, C to clear the map.",
        )
        .size(800, 640);

const GRID_W: usize = 20;
const GRID_H: usize = 14;
const TILE: f32 = 40.0;
const PALETTE_H: f32 = 80.0;
const TREASURES: usize = 5;
const MOVE_DELAY: u32 = 10;
const WIN_FRAMES: u32 = 180;

const PALETTE: [Tile; 4] = [Tile::Floor, Tile::Wall, Tile::Water, Tile::Spawn];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    Water,
    Treasure,
    Spawn,
}

impl Tile {
    fn name(self) -> &'static str {
        match self {
            Self::Floor => "Floor",
            Self::Wall => "Wall",
            Self::Water => "Water",
            Self::Treasure => "Treasure",
            Self::Spawn => "Spawn",
        }
    }

    fn base_color(self) -> (f32, f32, f32) {
        match self {
            Self::Wall => (50.0, 50.0, 50.0),
            Self::Water => (50.0, 100.0, 200.0),
            Self::Floor | Self::Treasure | Self::Spawn => (200.0, 200.0, 200.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Paint,
    Play,
}

/// Map, player and play-state rules. Holds no drawing state so it can be
/// driven directly from tests.
#[derive(Clone, Debug)]
pub struct Dungeon {
    grid: [[Tile; GRID_W]; GRID_H],
    mode: Mode,
    selected: Tile,
    player: (usize, usize),
    found: usize,
    total: usize,
    water_delay: u32,
    move_delay: u32,
    won_for: Option<u32>,
}

impl Default for Dungeon {
    fn default() -> Self {
        let mut grid = [[Tile::Floor; GRID_W]; GRID_H];
        grid[0][0] = Tile::Spawn;
        Self {
            grid,
            mode: Mode::Paint,
            selected: Tile::Floor,
            player: (0, 0),
            found: 0,
            total: 0,
            water_delay: 0,
            move_delay: 0,
            won_for: None,
        }
    }
}

impl Dungeon {
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.grid.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn player(&self) -> (usize, usize) {
        self.player
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.found, self.total)
    }

    pub fn has_won(&self) -> bool {
        self.won_for.is_some()
    }

    pub fn select(&mut self, tile: Tile) {
        self.selected = tile;
    }

    /// Paints the selected tile at a grid cell. Only works while painting.
    pub fn paint(&mut self, x: usize, y: usize) {
        if self.mode != Mode::Paint {
            return;
        }
        if let Some(cell) = self.grid.get_mut(y).and_then(|row| row.get_mut(x))
        {
            *cell = self.selected;
        }
    }

    pub fn clear(&mut self) {
        *self = Self {
            selected: self.selected,
            ..Self::default()
        };
    }

    /// Scatters treasures over floor tiles using `pick(n)`, which must
    /// return an index below `n`, and puts the player on the first spawn.
    pub fn start_play(&mut self, mut pick: impl FnMut(usize) -> usize) {
        for cell in self.grid.iter_mut().flatten() {
            if *cell == Tile::Treasure {
                *cell = Tile::Floor;
            }
        }

        let mut placed = 0;
        for _ in 0..1000 {
            if placed == TREASURES {
                break;
            }
            let (x, y) = (pick(GRID_W), pick(GRID_H));
            if let Some(cell) =
                self.grid.get_mut(y).and_then(|row| row.get_mut(x))
            {
                if *cell == Tile::Floor {
                    *cell = Tile::Treasure;
                    placed += 1;
                }
            }
        }

        self.player = self.spawn().unwrap_or((0, 0));
        self.found = 0;
        self.total = placed;
        self.water_delay = 0;
        self.move_delay = 0;
        self.won_for = None;
        self.mode = Mode::Play;
        info!("play mode started with {} treasure(s)", placed);
    }

    pub fn stop_play(&mut self) {
        self.mode = Mode::Paint;
        self.won_for = None;
    }

    /// Returns `true` if the player moved. Walls and edges block; stepping
    /// into water costs the next move.
    pub fn step(&mut self, dx: i32, dy: i32) -> bool {
        if self.mode != Mode::Play || self.has_won() {
            return false;
        }
        if self.water_delay > 0 {
            self.water_delay -= 1;
            return false;
        }
        if self.move_delay > 0 {
            return false;
        }

        let x = self.player.0 as i32 + dx;
        let y = self.player.1 as i32 + dy;
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let Some(tile) = self.tile(x, y) else {
            return false;
        };
        if tile == Tile::Wall {
            return false;
        }

        self.player = (x, y);
        self.move_delay = MOVE_DELAY;
        match tile {
            Tile::Treasure => {
                self.grid[y][x] = Tile::Floor;
                self.found += 1;
                if self.found >= self.total {
                    info!("all {} treasures found", self.total);
                    self.won_for = Some(0);
                }
            }
            Tile::Water => self.water_delay = 1,
            _ => {}
        }
        true
    }

    /// Advances cooldowns and the win timer by one frame. After the win
    /// screen has shown long enough the map goes back to painting.
    pub fn update(&mut self) {
        self.move_delay = self.move_delay.saturating_sub(1);
        if let Some(frames) = self.won_for.as_mut() {
            *frames += 1;
            if *frames > WIN_FRAMES {
                self.stop_play();
            }
        }
    }

    fn spawn(&self) -> Option<(usize, usize)> {
        self.grid.iter().enumerate().find_map(|(y, row)| {
            row.iter().position(|t| *t == Tile::Spawn).map(|x| (x, y))
        })
    }
}

pub struct DungeonTiles {
    dungeon: Dungeon,
}

pub fn init() -> DungeonTiles {
    DungeonTiles {
        dungeon: Dungeon::default(),
    }
}

fn grid_height() -> f32 {
    GRID_H as f32 * TILE
}

fn palette_button(i: usize) -> (f32, f32, f32, f32) {
    (20.0 + i as f32 * 140.0, grid_height() + 20.0, 120.0, 50.0)
}

impl DungeonTiles {
    fn paint_at(&mut self, x: f32, y: f32) {
        if x < 0.0 || y < 0.0 || y >= grid_height() {
            return;
        }
        self.dungeon.paint((x / TILE) as usize, (y / TILE) as usize);
    }

    fn draw_tile(&self, x: usize, y: usize, tile: Tile) {
        let (px, py) = (x as f32 * TILE, y as f32 * TILE);
        push();
        stroke_weight(1.0);
        stroke(60.0);
        if tile == Tile::Water {
            let shimmer =
                (frame_count() as f32 * 0.05 + (x + y) as f32 * 0.5).sin();
            fill(lerp_color(
                tile.base_color(),
                (80.0, 140.0, 230.0),
                shimmer * 0.5 + 0.5,
            ));
        } else {
            fill(tile.base_color());
        }
        rect(px, py, TILE, TILE);

        let center = (px + TILE / 2.0, py + TILE / 2.0);
        no_stroke();
        match tile {
            Tile::Treasure => {
                fill((255.0, 220.0, 0.0));
                circle(center.0, center.1, TILE * 0.5);
            }
            Tile::Spawn => {
                fill((0.0, 255.0, 100.0));
                circle(center.0, center.1, TILE * 0.3);
            }
            _ => {}
        }
        pop();
    }

    fn draw_palette(&self) {
        no_stroke();
        fill((30.0, 30.0, 40.0));
        rect(0.0, grid_height(), width(), PALETTE_H);

        text_align(TextAlign::Center);
        text_size(12.0);
        for (i, tile) in PALETTE.iter().enumerate() {
            let (x, y, w, h) = palette_button(i);
            if self.dungeon.mode() == Mode::Paint
                && self.dungeon.selected == *tile
            {
                stroke_weight(3.0);
                stroke((255.0, 255.0, 0.0));
            } else {
                stroke_weight(1.0);
                stroke(100.0);
            }
            fill(tile.base_color());
            rect(x, y, w, h);

            no_stroke();
            fill(255.0);
            text(tile.name(), x + w / 2.0, y + h / 2.0);
        }
    }

    fn draw_status(&self) {
        no_stroke();
        fill(255.0);
        text_align(TextAlign::Left);
        text_size(14.0);
        let status = match self.dungeon.mode() {
            Mode::Paint => "PAINT | P: play | 1-4: tile | C: clear".to_string(),
            Mode::Play => {
                let (found, total) = self.dungeon.progress();
                format!(
                    "PLAY | P: paint | arrows/WASD: move | treasures {}/{}",
                    found, total
                )
            }
        };
        text(status, 10.0, grid_height() + 5.0);
    }

    fn draw_win(&self) {
        no_stroke();
        fill((0.0, 0.0, 0.0, 200.0));
        rect(0.0, 0.0, width(), grid_height());

        text_align(TextAlign::Center);
        fill((255.0, 220.0, 0.0));
        text_size(48.0);
        text("YOU WIN!", width() / 2.0, grid_height() / 2.0);
        fill(255.0);
        text_size(24.0);
        text(
            "Returning to the painter...",
            width() / 2.0,
            grid_height() / 2.0 + 60.0,
        );
    }
}

impl Sketch for DungeonTiles {
    fn init(&mut self) -> SketchResult {
        debug!("dungeon grid {}x{} tiles of {}px", GRID_W, GRID_H, TILE);
        Ok(())
    }

    fn frame(&mut self) -> SketchResult {
        self.dungeon.update();
        background(40.0);

        for (y, row) in self.dungeon.grid.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                self.draw_tile(x, y, *tile);
            }
        }

        if self.dungeon.mode() == Mode::Play {
            let (x, y) = self.dungeon.player();
            no_stroke();
            fill((255.0, 100.0, 200.0));
            circle(
                x as f32 * TILE + TILE / 2.0,
                y as f32 * TILE + TILE / 2.0,
                TILE * 0.7,
            );
        }

        self.draw_palette();
        self.draw_status();
        if self.dungeon.has_won() {
            self.draw_win();
        }
        Ok(())
    }

    fn pointer_pressed(&mut self) -> SketchResult {
        let (x, y) = (pointer_x(), pointer_y());
        if self.dungeon.mode() != Mode::Paint {
            return Ok(());
        }

        if y < grid_height() {
            self.paint_at(x, y);
            return Ok(());
        }

        let picked = (0..PALETTE.len()).find(|&i| {
            let (bx, by, w, h) = palette_button(i);
            x > bx && x < bx + w && y > by && y < by + h
        });
        if let Some(i) = picked {
            self.dungeon.select(PALETTE[i]);
        }
        Ok(())
    }

    fn pointer_moved(&mut self) -> SketchResult {
        if pointer_is_pressed() {
            self.paint_at(pointer_x(), pointer_y());
        }
        Ok(())
    }

    fn key_pressed(&mut self) -> SketchResult {
        let Some(key) = key() else {
            return Ok(());
        };

        let step = match key {
            Key::ArrowUp => Some((0, -1)),
            Key::ArrowDown => Some((0, 1)),
            Key::ArrowLeft => Some((-1, 0)),
            Key::ArrowRight => Some((1, 0)),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'w' => Some((0, -1)),
                's' => Some((0, 1)),
                'a' => Some((-1, 0)),
                'd' => Some((1, 0)),
                'p' => {
                    match self.dungeon.mode() {
                        Mode::Paint => self.dungeon.start_play(|n| {
                            random(0.0, n as f32) as usize
                        }),
                        Mode::Play => self.dungeon.stop_play(),
                    }
                    None
                }
                'c' if self.dungeon.mode() == Mode::Paint => {
                    self.dungeon.clear();
                    None
                }
                c @ '1'..='4' => {
                    let index = c as usize - '1' as usize;
                    self.dungeon.select(PALETTE[index]);
                    None
                }
                _ => None,
            },
            _ => None,
        };

        if let Some((dx, dy)) = step {
            self.dungeon.step(dx, dy);
        }
        Ok(())
    }
}
