use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};
use tracing::{debug, info};

use crate::card::{CARD_SIZE, Card};
use crate::column::Column;

const FONT_CANDIDATES: &[&str] = &[
    "Arial", "Helvetica", "DejaVuSans-Bold", "DejaVuSans", "LiberationSans-Bold", "LiberationSans", "SegoeUI", "NotoSans-Bold", "NotoSans-Regular"
];

pub const FONT_ENV: &str = "BINGO_FONT_PATH";

const CELL_PX: u32 = 112;
const PADDING: u32 = 20;

const BACKGROUND: Rgb<u8> = Rgb([250, 250, 245]);
const GRID: Rgb<u8> = Rgb([30, 30, 30]);
const HEADER: Rgb<u8> = Rgb([40, 70, 160]);
const HEADER_TEXT: Rgb<u8> = Rgb([255, 255, 255]);
const CHECKED: Rgb<u8> = Rgb([255, 196, 64]);
const FREE: Rgb<u8> = Rgb([120, 200, 120]);
const TEXT: Rgb<u8> = Rgb([20, 20, 20]);

fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    let home = dirs_next::home_dir();
    if cfg!(target_os = "macos") {
        dirs.extend([PathBuf::from("/System/Library/Fonts"), PathBuf::from("/Library/Fonts")]);
        dirs.extend(home.map(|h| h.join("Library/Fonts")));
    } else if cfg!(target_os = "windows") {
        if let Some(win) = std::env::var_os("WINDIR") { dirs.push(PathBuf::from(win).join("Fonts")); }
        dirs.push(PathBuf::from("C:/Windows/Fonts"));
    } else {
        dirs.extend([PathBuf::from("/usr/share/fonts"), PathBuf::from("/usr/local/share/fonts")]);
        if let Some(home) = home {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
        }
    }
    dirs
}

fn collect_font_files() -> Vec<PathBuf> {
    font_search_dirs()
        .into_iter()
        .filter(|dir| dir.exists())
        .flat_map(|dir| walkdir::WalkDir::new(dir).follow_links(true).into_iter().filter_map(|e| e.ok()))
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf"))
        })
        .collect()
}

/// Loads font bytes: explicit path, then `BINGO_FONT_PATH`, then a system font.
///
/// System fonts are chosen by name first, otherwise by how many of the
/// glyphs a card needs (digits, the column letters, "FREE") they cover.
pub fn find_font_data(explicit: Option<&Path>) -> Option<Vec<u8>> {
    if let Some(path) = explicit {
        if let Ok(bytes) = fs::read(path) { return Some(bytes); }
    }
    if let Ok(path) = std::env::var(FONT_ENV) {
        if let Ok(bytes) = fs::read(&path) { return Some(bytes); }
    }

    let font_files = collect_font_files();
    for &cand in FONT_CANDIDATES {
        let hit = font_files.iter().find(|p| {
            p.file_stem().and_then(|s| s.to_str()).is_some_and(|s| s.eq_ignore_ascii_case(cand))
        });
        if let Some(bytes) = hit.and_then(|p| fs::read(p).ok()) { return Some(bytes); }
    }

    let needed: Vec<char> = "0123456789BINGOFRE".chars().collect();
    let mut best: Option<(usize, Vec<u8>)> = None;
    for path in &font_files {
        let Ok(bytes) = fs::read(path) else { continue };
        let Some(font) = Font::try_from_vec(bytes.clone()) else { continue };
        let score = needed.iter().filter(|&&c| font.glyph(c).id().0 != 0).count();
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            debug!(font = %path.display(), score, "font candidate");
            best = Some((score, bytes));
        }
    }
    best.map(|(_, bytes)| bytes)
}

struct TextPainter {
    font: Font<'static>,
    scale: Scale,
}

impl TextPainter {
    fn new(font_data: Vec<u8>, px: f32) -> Result<Self, Box<dyn Error>> {
        let font = Font::try_from_vec(font_data).ok_or("Invalid font data")?;
        Ok(Self { font, scale: Scale::uniform(px) })
    }

    fn text_width(&self, text: &str) -> f32 {
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draws `text` centred in the `size`x`size` square at (`left`, `top`).
    fn draw_centered(&self, img: &mut RgbImage, text: &str, left: u32, top: u32, size: u32, color: Rgb<u8>) {
        let v = self.font.v_metrics(self.scale);
        let x = left as f32 + (size as f32 - self.text_width(text)) / 2.0;
        let baseline = top as f32 + (size as f32 + v.ascent + v.descent) / 2.0;
        for glyph in self.font.layout(text, self.scale, point(x, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else { continue };
            glyph.draw(|gx, gy, coverage| {
                if coverage < 0.05 { return; }
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px as u32 >= img.width() || py as u32 >= img.height() { return; }
                let dst = img.get_pixel_mut(px as u32, py as u32);
                for i in 0..3 {
                    dst[i] = (dst[i] as f32 * (1.0 - coverage) + color[i] as f32 * coverage) as u8;
                }
            });
        }
    }
}

fn fill_rect(img: &mut RgbImage, left: u32, top: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in top..(top + h).min(img.height()) {
        for x in left..(left + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Lays the card out as an image: a B-I-N-G-O header row above the grid,
/// checked cells shaded, the centre labelled FREE.
pub fn draw_card(card: &Card, font_data: Option<Vec<u8>>, font_px: f32) -> Result<RgbImage, Box<dyn Error>> {
    let size = CARD_SIZE as u32;
    let grid_w = size * CELL_PX;
    // one extra row for the header
    let grid_h = (size + 1) * CELL_PX;
    let mut img = RgbImage::from_pixel(grid_w + PADDING * 2, grid_h + PADDING * 2, BACKGROUND);

    fill_rect(&mut img, PADDING, PADDING, grid_w, CELL_PX, HEADER);
    for (row, cells) in card.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let fill = if cell.is_free { FREE } else if cell.checked { CHECKED } else { BACKGROUND };
            let x = PADDING + col as u32 * CELL_PX;
            let y = PADDING + (row as u32 + 1) * CELL_PX;
            fill_rect(&mut img, x, y, CELL_PX, CELL_PX, fill);
        }
    }

    for i in 0..=size {
        let x = PADDING + i * CELL_PX;
        for y in PADDING..=(PADDING + grid_h) { img.put_pixel(x, y, GRID); }
    }
    for i in 0..=size + 1 {
        let y = PADDING + i * CELL_PX;
        for x in PADDING..=(PADDING + grid_w) { img.put_pixel(x, y, GRID); }
    }

    let Some(font_data) = font_data else { return Ok(img) };
    let painter = TextPainter::new(font_data, font_px)?;
    for column in Column::ALL {
        let x = PADDING + column.index() as u32 * CELL_PX;
        painter.draw_centered(&mut img, &column.to_string(), x, PADDING, CELL_PX, HEADER_TEXT);
    }
    for (row, cells) in card.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let label = match cell.number {
                Some(n) => n.to_string(),
                None => "FREE".to_string(),
            };
            let x = PADDING + col as u32 * CELL_PX;
            let y = PADDING + (row as u32 + 1) * CELL_PX;
            painter.draw_centered(&mut img, &label, x, y, CELL_PX, TEXT);
        }
    }
    Ok(img)
}

pub fn render_card_to_png(card: &Card, path: &Path, font_path: Option<&Path>, font_px: f32) -> Result<(), Box<dyn Error>> {
    let font_data = find_font_data(font_path).ok_or("No system font found for rendering")?;
    let img = draw_card(card, Some(font_data), font_px)?;
    let mut file = File::create(path)?;
    img.write_to(&mut file, image::ImageFormat::Png)?;
    info!(path = %path.display(), "card rendered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CENTER;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card() -> Card {
        Card::generate(&mut StdRng::seed_from_u64(17))
    }

    #[test]
    fn layout_shades_checked_and_free_cells() {
        let mut card = card();
        card.toggle(0, 0).unwrap();
        let img = draw_card(&card, None, 36.0).expect("draw");

        assert_eq!(img.width(), CARD_SIZE as u32 * CELL_PX + PADDING * 2);
        assert_eq!(img.height(), (CARD_SIZE as u32 + 1) * CELL_PX + PADDING * 2);

        let centre_of = |row: usize, col: usize| {
            let x = PADDING + col as u32 * CELL_PX + CELL_PX / 2;
            let y = PADDING + (row as u32 + 1) * CELL_PX + CELL_PX / 2;
            *img.get_pixel(x, y)
        };
        assert_eq!(centre_of(0, 0), CHECKED);
        assert_eq!(centre_of(CENTER, CENTER), FREE);
        assert_eq!(centre_of(4, 4), BACKGROUND);
        assert_eq!(*img.get_pixel(PADDING + 5, PADDING + 5), HEADER);
    }

    #[test]
    fn test_render_card_to_png() {
        if find_font_data(None).is_none() {
            eprintln!("no system font available, skipping");
            return;
        }
        let path = std::env::temp_dir().join(format!("bingo-hall-{}-card.png", std::process::id()));
        render_card_to_png(&card(), &path, None, 36.0).expect("render");
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }
}
