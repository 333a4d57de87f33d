// EDB - Ethereum Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Full-screen layout of a single step
//!
//! ```text
//! ┌ tracewalk ───────────────────────────────┐
//! │ pc 4 | PUSH1 | depth 2 | gas 20997 | ... │
//! │ Call path: CALL                          │
//! └──────────────────────────────────────────┘
//! ┌──────────────────────────────────────────┐
//! │ Category  Data                           │
//! │ Opcodes     CALL                         │
//! │           > PUSH1                        │
//! │ Stack     0x60                           │
//! │ Memory    No memory data                 │
//! │ Storage   No storage changes             │
//! └──────────────────────────────────────────┘
//!  Opcode 2 of 4
//!  ↑/↓ : Previous/Next Opcode  q: Quit
//! ```

use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use tracewalk_engine::{DisplayPayload, OpcodeLine};

use crate::config::ColorScheme;

/// Key help shown below the table
pub const HELP_LINE: &str = "↑/↓ : Previous/Next Opcode  q: Quit";

const CATEGORY_WIDTH: u16 = 10;

/// Draw `payload` over the whole frame
pub fn draw(frame: &mut Frame<'_>, payload: &DisplayPayload, theme: &ColorScheme) {
    let [header_area, table_area, position_area, help_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let border = Style::default().fg(theme.border());

    let header = Paragraph::new(vec![
        Line::from(payload.summary.as_str()),
        Line::from(call_path_line(&payload.call_path)),
    ])
    .block(Block::default().title(" tracewalk ").borders(Borders::ALL).border_style(border));
    frame.render_widget(header, header_area);

    // Borders and the header row
    let available = usize::from(table_area.height.saturating_sub(3));
    let sections = [
        (
            "Stack",
            section_text(payload.stack.lines(), payload.stack.is_placeholder(), theme),
        ),
        (
            "Memory",
            section_text(payload.memory.lines(), payload.memory.is_placeholder(), theme),
        ),
        (
            "Storage",
            section_text(payload.storage.lines(), payload.storage.is_placeholder(), theme),
        ),
    ];
    let budgets = fit_sections(
        available.saturating_sub(payload.opcodes.len()),
        sections.each_ref().map(|(_, text)| text.lines.len()),
    );

    let mut rows = vec![data_row("Opcodes", opcode_text(&payload.opcodes, theme))];
    for ((category, text), budget) in sections.into_iter().zip(budgets) {
        rows.push(data_row(category, truncate_text(text, budget, theme)));
    }
    let header_style = Style::default().fg(theme.header()).add_modifier(Modifier::BOLD);
    let table = Table::new(rows, [Constraint::Length(CATEGORY_WIDTH), Constraint::Min(0)])
        .header(Row::new(vec!["Category", "Data"]).style(header_style))
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(table, table_area);

    frame.render_widget(
        Paragraph::new(format!(" Opcode {}", payload.position)).style(header_style),
        position_area,
    );
    frame.render_widget(
        Paragraph::new(format!(" {HELP_LINE}")).style(Style::default().fg(theme.help_text())),
        help_area,
    );
}

/// Human readable call path, shared with the plain-text output
pub fn call_path_line(call_path: &[String]) -> String {
    if call_path.is_empty() {
        "Call path: (top level)".to_string()
    } else {
        format!("Call path: {}", call_path.join(" > "))
    }
}

fn data_row<'a>(category: &'a str, data: Text<'a>) -> Row<'a> {
    let height = u16::try_from(data.lines.len().max(1)).unwrap_or(u16::MAX);
    Row::new(vec![Cell::from(category), Cell::from(data)]).height(height)
}

/// Share `available` rows between sections of the given lengths
///
/// Every section gets at least one row. The remaining rows are handed out one
/// at a time to the sections that still have lines left, so a huge memory dump
/// cannot push the storage section off the screen.
fn fit_sections<const N: usize>(available: usize, lengths: [usize; N]) -> [usize; N] {
    let mut budgets = [1; N];
    let mut left = available.saturating_sub(N);
    while left > 0 {
        let mut granted = false;
        for (budget, len) in budgets.iter_mut().zip(lengths) {
            if left > 0 && *budget < len {
                *budget += 1;
                left -= 1;
                granted = true;
            }
        }
        if !granted {
            break;
        }
    }
    budgets
}

/// Keep at most `budget` lines, replacing the last kept one with a marker
fn truncate_text<'a>(mut text: Text<'a>, budget: usize, theme: &ColorScheme) -> Text<'a> {
    let total = text.lines.len();
    if total <= budget {
        return text;
    }

    let shown = budget.saturating_sub(1);
    text.lines.truncate(shown);
    text.lines.push(
        Line::from(format!("… {} more lines", total - shown))
            .style(Style::default().fg(theme.placeholder()).add_modifier(Modifier::ITALIC)),
    );
    text
}

fn opcode_text<'a>(opcodes: &'a [OpcodeLine], theme: &ColorScheme) -> Text<'a> {
    let selected = Style::default()
        .fg(theme.selected_fg())
        .bg(theme.selected_bg())
        .add_modifier(Modifier::BOLD);

    opcodes
        .iter()
        .map(|line| {
            if line.selected {
                Line::from(format!("> {}", line.op)).style(selected)
            } else {
                Line::from(format!("  {}", line.op))
            }
        })
        .collect::<Vec<_>>()
        .into()
}

fn section_text<'a>(lines: Vec<&'a str>, placeholder: bool, theme: &ColorScheme) -> Text<'a> {
    let text: Text<'a> = lines.into_iter().map(Line::from).collect::<Vec<_>>().into();
    if placeholder {
        text.style(Style::default().fg(theme.placeholder()).add_modifier(Modifier::ITALIC))
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tracewalk_common::{Memory, StepRecord};
    use tracewalk_engine::{render, DEFAULT_WINDOW_RADIUS};

    fn screen(payload: &DisplayPayload) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, payload, &ColorScheme::default())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draws_all_sections() {
        let mut step = StepRecord::new("PUSH1", 1);
        step.stack = Some(vec!["0x1".into(), "0x2".into()]);
        let steps = vec![StepRecord::new("JUMPDEST", 1), step, StepRecord::new("STOP", 1)];

        let text = screen(&render(&steps, 1, DEFAULT_WINDOW_RADIUS));

        assert!(text.contains("> PUSH1"));
        assert!(text.contains("  JUMPDEST"));
        assert!(text.contains("0x2"));
        assert!(text.contains("No memory data"));
        assert!(text.contains("No storage changes"));
        assert!(text.contains("Opcode 2 of 3"));
        assert!(text.contains("Call path: (top level)"));
        assert!(text.contains("q: Quit"));
    }

    #[test]
    fn test_long_memory_keeps_storage_visible() {
        let mut step = StepRecord::new("MSTORE", 1);
        step.memory = Memory::Chunks(vec!["00".to_string(); 40]);
        step.storage = Some([("0x0".to_string(), "0x2a".to_string())].into_iter().collect());
        let steps = vec![step];

        let text = screen(&render(&steps, 0, DEFAULT_WINDOW_RADIUS));

        assert!(text.contains("Storage"));
        assert!(text.contains("0x0: 0x2a"));
        assert!(text.contains("more lines"));
        assert!(text.contains("Opcode 1 of 1"));
    }

    #[test]
    fn test_fit_sections() {
        // Everything fits
        assert_eq!(fit_sections(10, [2, 3, 1]), [2, 3, 1]);
        // Short sections keep their lines, the long one takes the rest
        assert_eq!(fit_sections(20, [1, 40, 1]), [1, 18, 1]);
        // Round-robin between two long sections
        assert_eq!(fit_sections(9, [10, 10, 1]), [4, 4, 1]);
        // Not even one row each
        assert_eq!(fit_sections(1, [5, 5, 5]), [1, 1, 1]);
    }

    #[test]
    fn test_truncate_text_marks_hidden_lines() {
        let text: Text<'_> = vec![Line::from("a"), Line::from("b"), Line::from("c")].into();
        let truncated = truncate_text(text, 2, &ColorScheme::default());

        assert_eq!(truncated.lines.len(), 2);
        assert_eq!(truncated.lines[0].to_string(), "a");
        assert_eq!(truncated.lines[1].to_string(), "… 2 more lines");
    }

    #[test]
    fn test_call_path_line() {
        assert_eq!(call_path_line(&[]), "Call path: (top level)");
        assert_eq!(
            call_path_line(&["CALL".to_string(), "DELEGATECALL".to_string()]),
            "Call path: CALL > DELEGATECALL"
        );
    }
}
