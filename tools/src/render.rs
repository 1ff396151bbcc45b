//! Boxed rendering of accepted thoughts for the side-channel log.

use std::iter;

use unicode_width::UnicodeWidthStr;

use cascade_types::Thought;

/// What the caller knows about a thought beyond its own record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    /// Active branch when the thought was committed, `None` on main.
    pub branch: Option<&'a str>,
    /// Label of the sequence this thought started, if it started one.
    pub new_sequence: Option<&'a str>,
}

struct Frame {
    top: (char, char, char),
    side: char,
    divider: (char, char, char),
    bottom: (char, char, char),
}

const SINGLE: Frame = Frame {
    top: ('┌', '─', '┐'),
    side: '│',
    divider: ('├', '─', '┤'),
    bottom: ('└', '─', '┘'),
};

const DOUBLE: Frame = Frame {
    top: ('╔', '═', '╗'),
    side: '║',
    divider: ('╠', '═', '╣'),
    bottom: ('╚', '═', '╝'),
};

#[must_use]
pub fn render_thought(thought: &Thought, ctx: &RenderContext<'_>) -> String {
    let header = header_line(thought, ctx);
    let mut sequence = match ctx.new_sequence {
        Some(label) => format!("New Sequence: {label}"),
        None => format!("Sequence: {}", thought.sequence_id),
    };
    if thought.needs_more_thoughts {
        sequence.push_str(" [Expanding thoughts...]");
    }

    let frame = if ctx.new_sequence.is_some() {
        &DOUBLE
    } else {
        &SINGLE
    };
    draw_box(frame, &[header, sequence], &thought.content)
}

fn header_line(thought: &Thought, ctx: &RenderContext<'_>) -> String {
    let (prefix, context) = if let Some(origin) = &thought.branch {
        (
            "🌿 Branch",
            format!(
                " (from absolute thought {}, ID: {})",
                origin.from.value(),
                origin.branch_id
            ),
        )
    } else if ctx.new_sequence.is_some() {
        ("🆕 Thought", String::new())
    } else if let Some(revised) = thought.revises.filter(|_| thought.is_revision) {
        (
            "🔄 Revision",
            format!(" (revising absolute thought {})", revised.value()),
        )
    } else if let Some(branch) = ctx.branch {
        ("🌿 Thought", format!(" (on branch {branch})"))
    } else {
        ("💭 Thought", String::new())
    };

    let expanding = if thought.needs_more_thoughts { " ⚡" } else { "" };
    format!(
        "{prefix} {}/{}{expanding} [Absolute: {}]{context}",
        thought.sequence_position, thought.total_expected, thought.absolute_position
    )
}

fn draw_box(frame: &Frame, head: &[String], content: &str) -> String {
    let body: Vec<&str> = if content.is_empty() {
        vec![""]
    } else {
        content.lines().collect()
    };
    let width = head
        .iter()
        .map(String::as_str)
        .chain(body.iter().copied())
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0);

    let rule = |(left, fill, right): (char, char, char)| {
        let mut line = String::with_capacity(width + 4);
        line.push(left);
        line.extend(iter::repeat_n(fill, width + 2));
        line.push(right);
        line
    };
    let row = |text: &str| {
        let pad = width - text.width();
        format!("{side} {text}{} {side}", " ".repeat(pad), side = frame.side)
    };

    let mut lines = Vec::with_capacity(head.len() + body.len() + 3);
    lines.push(rule(frame.top));
    lines.extend(head.iter().map(|line| row(line)));
    lines.push(rule(frame.divider));
    lines.extend(body.iter().map(|line| row(line)));
    lines.push(rule(frame.bottom));
    lines.join("\n")
}
