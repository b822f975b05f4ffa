//! Advanced SubStation Alpha (ASS) rendering.
//!
//! Output is a fixed skeleton: `[Script Info]`, a `[V4+ Styles]` section
//! holding one `Default` style, and an `[Events]` section with one
//! `Dialogue` line per entry.

use cuekit_common::Timecode;
use cuekit_track_model::SubtitleEntry;

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const DEFAULT_STYLE: &str = "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,\
0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1";

const EVENT_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Render entries as an ASS script titled `title`.
pub fn render(title: &str, entries: &[SubtitleEntry]) -> String {
    let header = format!(
        "[Script Info]\n\
         Title: {title}\n\
         ScriptType: v4.00+\n\
         Collisions: Normal\n\
         PlayResX: 1920\n\
         PlayResY: 1080\n\
         \n\
         [V4+ Styles]\n\
         {STYLE_FORMAT}\n\
         {DEFAULT_STYLE}\n\
         \n\
         [Events]\n\
         {EVENT_FORMAT}\n"
    );

    let events = entries
        .iter()
        .map(|entry| {
            format!(
                "Dialogue: 0,{},{},Default,,0,0,0,,{}",
                format_time(entry.start_time),
                format_time(entry.end_time),
                escape_text(&entry.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    header + &events
}

/// Line breaks inside a Dialogue line are written as the `\N` override.
fn escape_text(text: &str) -> String {
    text.replace('\n', "\\N")
}

/// Format seconds as ASS timestamp: H:MM:SS.cc
pub fn format_time(secs: f64) -> String {
    Timecode::from_secs(secs).display_centis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuekit_track_model::EntryDraft;

    #[test]
    fn test_ass_sections() {
        let entries = vec![EntryDraft::new(1.0, 2.5, "Hi").into_entry(1)];
        let ass = render("English", &entries);

        assert!(ass.starts_with("[Script Info]\nTitle: English\n"));
        assert!(ass.contains("\n\n[V4+ Styles]\nFormat: Name, Fontname,"));
        assert!(ass.contains("\nStyle: Default,Arial,20,&H00FFFFFF,"));
        assert!(ass.contains(
            "\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"
        ));
        assert!(ass.ends_with("Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,Hi"));
    }

    #[test]
    fn test_dialogue_lines_are_newline_joined() {
        let entries = vec![
            EntryDraft::new(0.0, 1.0, "a").into_entry(1),
            EntryDraft::new(1.0, 2.0, "b").into_entry(2),
        ];
        let ass = render("t", &entries);
        assert!(ass.contains(
            "Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,a\n\
             Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,b"
        ));
    }

    #[test]
    fn test_multiline_text_uses_hard_breaks() {
        let entries = vec![EntryDraft::new(0.0, 1.0, "top\nbottom").into_entry(1)];
        assert!(render("t", &entries).ends_with(",,top\\Nbottom"));
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(0.0), "0:00:00.00");
        assert_eq!(format_time(3661.999), "1:01:01.99");
        assert_eq!(format_time(3661.5), "1:01:01.50");
    }
}
