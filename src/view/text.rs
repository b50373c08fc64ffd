//! Fitting line text into terminal columns.

use super::constants::TAB_WIDTH;
use unicode_width::UnicodeWidthChar;

/// The part of `line` visible after skipping `skip` columns, at most
/// `width` columns wide.
///
/// A trailing `\r` is dropped, tabs expand to spaces and other control
/// characters are not shown. A wide character straddling the left edge is
/// replaced by a space so columns stay aligned.
pub fn visible_slice(line: &str, skip: usize, width: usize) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut out = String::new();
    let mut column = 0;
    let mut used = 0;

    for ch in line.chars() {
        if used >= width {
            break;
        }
        if ch == '\t' {
            for _ in 0..TAB_WIDTH {
                if column >= skip && used < width {
                    out.push(' ');
                    used += 1;
                }
                column += 1;
            }
            continue;
        }
        let Some(ch_width) = ch.width() else {
            continue;
        };
        if ch_width == 0 {
            if column > skip {
                out.push(ch);
            }
            continue;
        }

        let end = column + ch_width;
        if end <= skip {
            column = end;
            continue;
        }
        if column < skip {
            // Cut by the left edge.
            for _ in skip..end {
                if used < width {
                    out.push(' ');
                    used += 1;
                }
            }
        } else if used + ch_width <= width {
            out.push(ch);
            used += ch_width;
        } else {
            break;
        }
        column = end;
    }
    out
}
