//! Screen layout
//!
//! The time sits centered at the top in red, the label centered under it
//! in red, and the body is left-aligned and word-wrapped in black. The body
//! font shrinks as the text gets longer, and again if the wrapped lines
//! would run off the bottom. Text that does not fit even at the smallest
//! size ends in an ellipsis.

use alloc::vec::Vec;

use chronoverse_core::payload::DisplayPayload;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_7X13, FONT_9X15};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::prelude::*;

use crate::color::TriColor;

const MARGIN_X: u32 = 6;
const TIME_Y: i32 = 4;
const LABEL_Y: i32 = 28;
const BODY_Y: i32 = 30;
const BODY_Y_BELOW_LABEL: i32 = 46;
const LINE_GAP: u32 = 2;
const ELLIPSIS: &str = "...";

const TIME_FONT: &MonoFont<'static> = &FONT_10X20;
const LABEL_FONT: &MonoFont<'static> = &FONT_9X15;

/// Body font size, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontTier {
    Largest,
    Large,
    Small,
    Smallest,
}

impl FontTier {
    /// Pick the tier for a body of `len` characters
    pub fn for_body_len(len: usize) -> Self {
        match len {
            0..=79 => Self::Largest,
            80..=119 => Self::Large,
            120..=239 => Self::Small,
            _ => Self::Smallest,
        }
    }

    /// Next size down, if any
    pub fn smaller(self) -> Option<Self> {
        match self {
            Self::Largest => Some(Self::Large),
            Self::Large => Some(Self::Small),
            Self::Small => Some(Self::Smallest),
            Self::Smallest => None,
        }
    }

    /// 1 for the largest tier through 4 for the smallest
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Largest => &FONT_10X20,
            Self::Large => &FONT_9X15,
            Self::Small => &FONT_7X13,
            Self::Smallest => &FONT_6X10,
        }
    }
}

/// One positioned run of text, top-left anchored
#[derive(Debug, Clone, Copy)]
pub struct TextItem<'a> {
    pub text: &'a str,
    pub position: Point,
    pub font: &'static MonoFont<'static>,
    pub color: TriColor,
}

/// Everything to draw for one payload
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub tier: FontTier,
    pub items: Vec<TextItem<'a>>,
}

/// Lay out `payload` on a landscape screen of `size`
pub fn layout(payload: &DisplayPayload, size: Size) -> Layout<'_> {
    let mut items = Vec::new();

    items.push(TextItem {
        text: payload.time_text.as_str(),
        position: Point::new(centered_x(payload.time_text.as_str(), TIME_FONT, size), TIME_Y),
        font: TIME_FONT,
        color: TriColor::Red,
    });

    let label = payload.label.as_deref().filter(|l| !l.is_empty());
    if let Some(label) = label {
        items.push(TextItem {
            text: label,
            position: Point::new(centered_x(label, LABEL_FONT, size), LABEL_Y),
            font: LABEL_FONT,
            color: TriColor::Red,
        });
    }

    let top = if label.is_some() {
        BODY_Y_BELOW_LABEL
    } else {
        BODY_Y
    };
    let mut tier = FontTier::for_body_len(payload.body.chars().count());
    let mut lines = body_lines(&payload.body, tier, size);
    while lines.len() > lines_that_fit(tier.font(), top, size) {
        let Some(next) = tier.smaller() else {
            break;
        };
        tier = next;
        lines = body_lines(&payload.body, tier, size);
    }

    let font = tier.font();
    let line_height = (font.character_size.height + LINE_GAP) as i32;
    let capacity = lines_that_fit(font, top, size);
    let overflow = lines.len() > capacity;
    lines.truncate(capacity);
    if overflow {
        if let Some(last) = lines.last_mut() {
            let line: &str = *last;
            let keep = columns(font, size).saturating_sub(ELLIPSIS.len());
            let cut = line.char_indices().nth(keep).map_or(line.len(), |(i, _)| i);
            *last = line[..cut].trim_end();
        }
    }

    let mut y = top;
    for &line in &lines {
        items.push(TextItem {
            text: line,
            position: Point::new(MARGIN_X as i32, y),
            font,
            color: TriColor::Black,
        });
        y += line_height;
    }
    if let (true, Some(last)) = (overflow, lines.last()) {
        let x = MARGIN_X + advance(font) * last.chars().count() as u32;
        items.push(TextItem {
            text: ELLIPSIS,
            position: Point::new(x as i32, y - line_height),
            font,
            color: TriColor::Black,
        });
    }

    Layout { tier, items }
}

fn body_lines(body: &str, tier: FontTier, size: Size) -> Vec<&str> {
    if body.is_empty() {
        return Vec::new();
    }
    wrap_text(body, columns(tier.font(), size))
}

fn columns(font: &MonoFont<'_>, size: Size) -> usize {
    (size.width.saturating_sub(2 * MARGIN_X) / advance(font)) as usize
}

/// Lines of `font` whose bottom edge stays on screen when the first one
/// starts at `top`
fn lines_that_fit(font: &MonoFont<'_>, top: i32, size: Size) -> usize {
    let glyph = font.character_size.height as i32;
    let room = size.height as i32 - top - glyph;
    if room < 0 {
        return 0;
    }
    (room / (glyph + LINE_GAP as i32)) as usize + 1
}

fn advance(font: &MonoFont<'_>) -> u32 {
    font.character_size.width + font.character_spacing
}

fn centered_x(text: &str, font: &MonoFont<'_>, size: Size) -> i32 {
    let width = advance(font) * text.chars().count() as u32;
    (size.width.saturating_sub(width) / 2) as i32
}

/// Greedy word wrap to at most `columns` characters per line
///
/// Words longer than a line are broken mid-word. Explicit newlines start a
/// new line.
pub fn wrap_text(text: &str, columns: usize) -> Vec<&str> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut rest = paragraph.trim();
        if rest.is_empty() {
            lines.push(rest);
            continue;
        }
        while !rest.is_empty() {
            let (line, next) = split_line(rest, columns);
            lines.push(line.trim_end());
            rest = next.trim_start();
        }
    }
    lines
}

fn split_line(text: &str, columns: usize) -> (&str, &str) {
    let Some((cut, ch)) = text.char_indices().nth(columns) else {
        return (text, "");
    };
    if ch.is_whitespace() {
        return text.split_at(cut);
    }
    match text[..cut].rfind(char::is_whitespace) {
        Some(space) if space > 0 => text.split_at(space),
        _ => text.split_at(cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use chronoverse_core::time::Timestamp;
    use proptest::prelude::*;

    const SCREEN: Size = Size::new(296, 128);

    fn payload(label: Option<&str>, body: &str) -> DisplayPayload {
        let mut payload = DisplayPayload::time_only(&Timestamp::new(5, 7, 0, 0).unwrap());
        payload.label = label.map(String::from);
        payload.body = String::from(body);
        payload
    }

    #[test]
    fn test_font_tier_thresholds() {
        assert_eq!(FontTier::for_body_len(79).rank(), 1);
        assert_eq!(FontTier::for_body_len(80).rank(), 2);
        assert_eq!(FontTier::for_body_len(119).rank(), 2);
        assert_eq!(FontTier::for_body_len(120).rank(), 3);
        assert_eq!(FontTier::for_body_len(239).rank(), 3);
        assert_eq!(FontTier::for_body_len(240).rank(), 4);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let lines = wrap_text("The Lord is my shepherd; I shall not want.", 12);
        assert_eq!(lines, ["The Lord is", "my shepherd;", "I shall not", "want."]);
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(wrap_text("abcdefgh ij", 3), ["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("one\n\ntwo", 10), ["one", "", "two"]);
        assert!(wrap_text("", 10) == [""]);
    }

    #[test]
    fn test_time_centered_in_red() {
        let payload = payload(None, "");
        let layout = layout(&payload, SCREEN);
        let time = layout.items[0];
        assert_eq!(time.text, "05:07");
        assert_eq!(time.color, TriColor::Red);
        // 5 glyphs of 10 px on 296 px
        assert_eq!(time.position, Point::new(123, TIME_Y));
        assert_eq!(layout.items.len(), 1);
    }

    #[test]
    fn test_body_moves_down_under_label() {
        let with_label = payload(Some("[Psalms]"), "short");
        let layout_a = layout(&with_label, SCREEN);
        assert_eq!(layout_a.items[1].text, "[Psalms]");
        assert_eq!(layout_a.items[1].color, TriColor::Red);
        assert_eq!(layout_a.items[2].position.y, BODY_Y_BELOW_LABEL);
        assert_eq!(layout_a.items[2].color, TriColor::Black);

        let without = payload(Some(""), "short");
        let layout_b = layout(&without, SCREEN);
        assert_eq!(layout_b.items.len(), 2);
        assert_eq!(layout_b.items[1].position, Point::new(MARGIN_X as i32, BODY_Y));
    }

    #[test]
    fn test_long_body_uses_small_font() {
        let body = "word ".repeat(50);
        let payload = payload(None, &body);
        let layout = layout(&payload, SCREEN);
        assert_eq!(layout.tier, FontTier::Smallest);
        let columns = ((296 - 2 * MARGIN_X) / 6) as usize;
        assert!(layout.items[1..]
            .iter()
            .all(|item| item.text.chars().count() <= columns));
    }

    fn bottom(item: &TextItem<'_>) -> i32 {
        item.position.y + item.font.character_size.height as i32
    }

    #[test]
    fn test_body_steps_down_to_fit_under_label() {
        let body = "word ".repeat(48);
        let payload = payload(Some("[Psalms]"), body.trim_end());
        assert_eq!(FontTier::for_body_len(payload.body.len()), FontTier::Small);

        let layout = layout(&payload, SCREEN);
        assert_eq!(layout.tier, FontTier::Smallest);
        assert_eq!(layout.items.len(), 2 + 6);
        assert!(layout.items.iter().all(|item| item.text != ELLIPSIS));
        assert!(layout.items.iter().all(|item| bottom(item) <= 128));
    }

    #[test]
    fn test_overflow_ends_in_ellipsis() {
        let body = "word ".repeat(80);
        let payload = payload(Some("[Psalms]"), &body);
        let layout = layout(&payload, SCREEN);

        assert_eq!(layout.tier, FontTier::Smallest);
        // Time, label, seven body lines, ellipsis
        assert_eq!(layout.items.len(), 10);
        let last = layout.items[9];
        assert_eq!(last.text, ELLIPSIS);
        assert_eq!(last.position, Point::new(6 + 44 * 6, BODY_Y_BELOW_LABEL + 6 * 12));
        assert_eq!(bottom(&last), 128);
    }

    proptest! {
        #[test]
        fn test_items_stay_on_screen(
            body in "[a-z ]{0,400}",
            with_label in any::<bool>(),
        ) {
            let label = if with_label { Some("[Psalms]") } else { None };
            let payload = payload(label, &body);
            let layout = layout(&payload, SCREEN);
            for item in &layout.items {
                prop_assert!(bottom(item) <= SCREEN.height as i32);
                let width = advance(item.font) * item.text.chars().count() as u32;
                prop_assert!(item.position.x as u32 + width <= SCREEN.width);
            }
        }

        #[test]
        fn test_font_tier_monotonic(a in 0usize..1000, b in 0usize..1000) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(FontTier::for_body_len(short) <= FontTier::for_body_len(long));
        }

        #[test]
        fn test_wrap_respects_columns(text in "[a-z ]{0,200}", columns in 1usize..40) {
            for line in wrap_text(&text, columns) {
                prop_assert!(line.chars().count() <= columns);
            }
        }
    }
}
