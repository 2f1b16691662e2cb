use crate::body::Advance;
use crate::frame::Frame;
use crate::{GameResult, GridSurface};

bitflags::bitflags! {
    /// Firmware console attribute byte: foreground color in the low nibble,
    /// background color in the next three bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Attribute: u8 {
        const FG_BLUE   = 0x01;
        const FG_GREEN  = 0x02;
        const FG_RED    = 0x04;
        const FG_BRIGHT = 0x08;
        const WHITE     = 0x0F;
        const BG_BLUE   = 0x10;
        const BG_GREEN  = 0x20;
        const BG_RED    = 0x40;
    }
}

/// White on red for the playing field.
pub const FIELD_ATTRIBUTE: Attribute = Attribute::WHITE.union(Attribute::BG_RED);

/// White on black for the game-over screen.
pub const BANNER_ATTRIBUTE: Attribute = Attribute::WHITE;

pub const BLOCK_GLYPH: char = '\u{2588}';
pub const BLANK_GLYPH: char = ' ';
pub const GAME_OVER_BANNER: &str = "Game Over!";

/// Clear the surface and draw the border ring on the boundary cells.
pub fn draw_field<S: GridSurface + ?Sized>(surface: &mut S, frame: &Frame) -> GameResult<()> {
    surface.set_attribute(FIELD_ATTRIBUTE)?;
    surface.clear()?;

    for col in frame.left..=frame.right {
        surface.write_glyph(col as u16, frame.top as u16, BLOCK_GLYPH)?;
        surface.write_glyph(col as u16, frame.bottom as u16, BLOCK_GLYPH)?;
    }
    for row in (frame.top + 1)..frame.bottom {
        surface.write_glyph(frame.left as u16, row as u16, BLOCK_GLYPH)?;
        surface.write_glyph(frame.right as u16, row as u16, BLOCK_GLYPH)?;
    }

    Ok(())
}

/// Per-tick delta: erase the vacated tail cell, then draw the new head.
pub fn draw_advance<S: GridSurface + ?Sized>(surface: &mut S, advance: &Advance) -> GameResult<()> {
    if let Some(tail) = advance.freed_tail {
        surface.write_glyph(tail.x as u16, tail.y as u16, BLANK_GLYPH)?;
    }
    surface.write_glyph(
        advance.new_head.x as u16,
        advance.new_head.y as u16,
        BLOCK_GLYPH,
    )
}

/// Game-over screen: attribute change, clear, centered banner.
pub fn draw_game_over<S: GridSurface + ?Sized>(surface: &mut S, frame: &Frame) -> GameResult<()> {
    surface.set_attribute(BANNER_ATTRIBUTE)?;
    surface.clear()?;

    let col = (frame.columns / 2).saturating_sub(GAME_OVER_BANNER.len() as u16 / 2);
    surface.write_text(col, frame.rows / 2, GAME_OVER_BANNER)
}
