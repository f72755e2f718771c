//! Table row recovery from extracted page text.
//!
//! The text extractor flattens PDF tables into plain lines. Lines that
//! still look tabular (tab-, pipe-, or multi-space-aligned columns) are
//! split back into cells here so the composer can rebuild one combined
//! table block for the language model.

/// Lines shorter than this cannot plausibly hold two columns.
const MIN_LINE_LEN: usize = 5;

/// Scan page text and return every tabular-looking line as a row of cells.
pub fn collect_table_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| is_tabular_line(line))
        .map(split_table_cells)
        .collect()
}

/// Heuristic: a line looks tabular if it has multiple columns separated by
/// tabs, pipes, or consistent multi-space gaps.
///
/// Patterns detected:
/// - Tab-separated: "Week 3\tQuiz 1\tSep 15"
/// - Pipe-separated: "Week 3 | Quiz 1 | Sep 15"
/// - Multi-space aligned: "Week 3    Quiz 1    Sep 15"
pub fn is_tabular_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() < MIN_LINE_LEN {
        return false;
    }

    if trimmed.matches('\t').count() >= 2 {
        return true;
    }

    if trimmed.matches('|').count() >= 2 {
        return true;
    }

    count_multi_space_gaps(trimmed) >= 2
}

/// Split a tabular line into trimmed cell values, using whichever
/// separator style the line exhibits. Interior empty cells are kept as
/// empty strings so column positions survive.
pub fn split_table_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();

    if trimmed.matches('\t').count() >= 2 {
        return trimmed.split('\t').map(|c| c.trim().to_string()).collect();
    }

    if trimmed.matches('|').count() >= 2 {
        return trimmed
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect();
    }

    split_on_multi_space(trimmed)
}

/// Count runs of 3+ consecutive spaces that separate non-empty text segments.
fn count_multi_space_gaps(text: &str) -> usize {
    let mut count = 0;
    let mut in_gap = false;
    let mut gap_len = 0;

    for ch in text.chars() {
        if ch == ' ' {
            gap_len += 1;
            if gap_len >= 3 && !in_gap {
                in_gap = true;
                count += 1;
            }
        } else {
            in_gap = false;
            gap_len = 0;
        }
    }

    count
}

/// Split on runs of 3+ spaces, keeping the segments in column order.
fn split_on_multi_space(text: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut space_run = 0;

    for ch in text.chars() {
        if ch == ' ' {
            space_run += 1;
            if space_run < 3 {
                current.push(ch);
            } else if space_run == 3 {
                // The first two spaces of the gap were pushed; strip them.
                cells.push(current.trim_end().to_string());
                current.clear();
            }
        } else {
            space_run = 0;
            current.push(ch);
        }
    }

    if !current.trim().is_empty() {
        cells.push(current.trim_end().to_string());
    }

    cells
}
