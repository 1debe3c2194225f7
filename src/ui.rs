use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::practice::PracticeSession;
use crate::visibility::{is_hidden, PLACEHOLDER};
use crate::word::{chars_match, is_skippable};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const PREV_ARROW: &str = "‹ ";
const NEXT_ARROW: &str = " ›";
const HELP: &str = "←/→ word   ⏎ speak   1/2 us/uk   tab reveal   ↑/↓ mode   esc quit";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(1),    // top padding
                Constraint::Length(1), // word
                Constraint::Length(1), // pronunciation
                Constraint::Length(1), // padding
                Constraint::Length(3), // definitions and example
                Constraint::Min(1),    // bottom padding
                Constraint::Length(1), // stats
                Constraint::Length(1), // help
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(self.book_name.clone(), bold_style),
            Span::styled(
                format!(
                    "   word {}/{}   mode {}   accent {}",
                    session.current_index() + 1,
                    session.word_count(),
                    session.display_mode(),
                    session.accent()
                ),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        if session.is_finished() {
            let done = Paragraph::new(Span::styled(
                format!("all {} words done", session.word_count()),
                bold_style.fg(Color::Green),
            ))
            .alignment(Alignment::Center);
            done.render(chunks[2], buf);
        } else {
            let word_line = word_line(session, self.reveal);
            Paragraph::new(word_line)
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        let word = session.current_word();
        if let Some(pronunciation) = &word.pronunciation {
            Paragraph::new(Span::styled(pronunciation.clone(), dim_style))
                .alignment(Alignment::Center)
                .render(chunks[3], buf);
        }

        let mut details: Vec<Line> = word
            .definitions
            .iter()
            .take(2)
            .map(|d| Line::from(Span::styled(d.clone(), italic_style)))
            .collect();
        if let Some(example) = word.examples.first() {
            details.push(Line::from(Span::styled(
                mask_word_in(example, &word.text),
                dim_style,
            )));
        }
        Paragraph::new(details)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[5], buf);

        let stats = session.stats();
        Paragraph::new(Span::styled(
            format!(
                "{} attempts   {} correct   {}% acc",
                stats.input_count,
                stats.correct_count,
                stats.accuracy()
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);

        Paragraph::new(Span::styled(HELP, dim_style.patch(italic_style)))
            .alignment(Alignment::Center)
            .render(chunks[8], buf);
    }
}

/// The word as spaced-out letters with the boundary arrows. Arrows are
/// left out entirely at the ends of the list.
fn word_line(session: &PracticeSession, reveal: bool) -> Line<'static> {
    let speller = session.speller();
    let entered = speller.entered();
    let mask = session.mask();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = bold_style.fg(Color::Green);
    let red_bold_style = bold_style.fg(Color::Red);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let cursor_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

    let mut spans = vec![];
    let shake = session.shake_offset() as usize * 2;
    if shake > 0 {
        spans.push(Span::raw(" ".repeat(shake)));
    }
    spans.push(Span::styled(
        if session.can_prev() { PREV_ARROW } else { "  " },
        dim_bold_style,
    ));

    for (idx, &ch) in speller.chars().iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let span = if let Some(&typed) = entered.get(&idx) {
            if speller.is_error() && idx == speller.position() {
                Span::styled(typed.to_string(), red_bold_style)
            } else {
                Span::styled(ch.to_string(), green_bold_style)
            }
        } else if is_skippable(ch) {
            Span::raw(" ")
        } else {
            let shown = if is_hidden(mask, idx, entered, reveal) {
                PLACEHOLDER
            } else {
                ch
            };
            let style = if idx == speller.position() {
                cursor_style
            } else {
                dim_bold_style
            };
            Span::styled(shown.to_string(), style)
        };
        spans.push(span);
    }

    spans.push(Span::styled(
        if session.can_next() { NEXT_ARROW } else { "  " },
        dim_bold_style,
    ));
    Line::from(spans)
}

/// Blanks out the practised word inside an example sentence.
///
/// Matching walks the original characters, so the slice bounds are always
/// char boundaries of `sentence` even when case folding changes byte lengths.
fn mask_word_in(sentence: &str, word: &str) -> String {
    let needle: Vec<char> = word.chars().collect();
    if needle.is_empty() {
        return sentence.to_string();
    }
    let indexed: Vec<(usize, char)> = sentence.char_indices().collect();

    let found = indexed.windows(needle.len()).find_map(|window| {
        let hit = window
            .iter()
            .zip(&needle)
            .all(|(&(_, c), &w)| chars_match(c, w));
        hit.then(|| {
            let (start, _) = window[0];
            let (last, last_ch) = window[needle.len() - 1];
            (start, last + last_ch.len_utf8())
        })
    });

    match found {
        Some((start, end)) => {
            let blank = "_".repeat(sentence[start..end].width());
            format!("{}{}{}", &sentence[..start], blank, &sentence[end..])
        }
        None => sentence.to_string(),
    }
}
