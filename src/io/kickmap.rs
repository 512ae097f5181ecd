//! Reading and writing kick-map text files.
//!
//! Fields are located by their index among the non-empty lines of the
//! file, as listed in [`line_index`].

use super::utils::{self, invalid_data};
use crate::{io_result, kickmap::KickMap, tracing::ftr};
use chrono::Local;
use ndarray::{Array2, ArrayView2};
use std::{io, path::Path};

/// Indices of the non-empty lines holding each field of a kick-map file.
pub mod line_index {
    pub const ID_LENGTH: usize = 3;
    pub const NX: usize = 5;
    pub const NY: usize = 7;
    pub const HORIZONTAL_X: usize = 10;

    /// Line holding the y-coordinate and horizontal kicks of row `i`.
    pub fn horizontal_row(i: usize) -> usize {
        HORIZONTAL_X + 1 + i
    }

    /// Line holding the x-coordinates of the vertical kick table.
    pub fn vertical_x(ny: usize) -> usize {
        horizontal_row(ny) + 2
    }

    /// Line holding the y-coordinate and vertical kicks of row `i`.
    pub fn vertical_row(ny: usize, i: usize) -> usize {
        vertical_x(ny) + 1 + i
    }
}

const X_INDENT_HORIZONTAL: usize = 13;
const X_INDENT_VERTICAL: usize = 14;
const NAN_PADDING: usize = 9;

/// Formats a number in signed exponential notation with six decimals
/// and an exponent of at least two digits, e.g. `+1.250000e-03`.
pub fn format_signed_exponential(value: ftr) -> String {
    if value.is_nan() {
        return "+nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+inf" } else { "-inf" }.to_string();
    }
    let formatted = format!("{:+.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => format!("{}e{:+03}", mantissa, exponent),
            Err(_) => formatted,
        },
        None => formatted,
    }
}

fn write_table(
    text: &mut String,
    title: &str,
    x_indent: usize,
    kick_map: &KickMap,
    kicks: ArrayView2<ftr>,
) {
    text.push_str(&format!("# {} KickTable in T2m2\nSTART\n", title));
    text.push_str(&" ".repeat(x_indent));
    for &x in kick_map.x() {
        text.push_str(&format_signed_exponential(x));
        text.push(' ');
    }
    text.push('\n');
    for (&y, row) in kick_map.y().iter().zip(kicks.outer_iter()) {
        text.push_str(&format_signed_exponential(y));
        text.push(' ');
        for &kick in row {
            text.push_str(&format_signed_exponential(kick));
            if kick.is_nan() {
                text.push_str(&" ".repeat(NAN_PADDING));
            }
            text.push(' ');
        }
        text.push('\n');
    }
}

/// Formats the given kick-map as kick-map file text.
pub fn format_kick_map(kick_map: &KickMap) -> String {
    let mut text = format!(
        "# KICKMAP\n\
         # Author: {} {}, Date: {}\n\
         # ID Length [m]\n\
         {:?}\n\
         # Number of Horizontal Points\n\
         {}\n\
         # Number of Vertical Points\n\
         {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        kick_map.id_length(),
        kick_map.nx(),
        kick_map.ny()
    );
    write_table(
        &mut text,
        "Horizontal",
        X_INDENT_HORIZONTAL,
        kick_map,
        kick_map.kick_x().view(),
    );
    write_table(
        &mut text,
        "Vertical",
        X_INDENT_VERTICAL,
        kick_map,
        kick_map.kick_y().view(),
    );
    text
}

fn line<'a>(lines: &[&'a str], idx: usize) -> io::Result<&'a str> {
    lines.get(idx).copied().ok_or_else(|| {
        invalid_data(format!(
            "Kick-map ends after {} lines, expected at least {}",
            lines.len(),
            idx + 1
        ))
    })
}

fn parse_value<T: std::str::FromStr>(text: &str, name: &str) -> io::Result<T>
where
    T::Err: std::fmt::Display,
{
    text.parse()
        .map_err(|err| invalid_data(format!("Invalid {} {} in kick-map: {}", name, text, err)))
}

fn parse_values(line: &str, name: &str) -> io::Result<Vec<ftr>> {
    line.split_whitespace()
        .map(|token| parse_value(token, name))
        .collect()
}

/// Parses kick-map file text.
pub fn parse_kick_map(text: &str) -> io::Result<KickMap> {
    let lines: Vec<&str> = utils::non_empty_lines(text).collect();

    let id_length: ftr = parse_value(line(&lines, line_index::ID_LENGTH)?, "ID length")?;
    let nx: usize = parse_value(
        line(&lines, line_index::NX)?,
        "number of horizontal points",
    )?;
    let ny: usize = parse_value(
        line(&lines, line_index::NY)?,
        "number of vertical points",
    )?;
    let x = parse_values(line(&lines, line_index::HORIZONTAL_X)?, "x-coordinate")?;
    if x.len() != nx {
        return Err(invalid_data(format!(
            "Kick-map has {} x-coordinates, expected {}",
            x.len(),
            nx
        )));
    }

    let mut y = Vec::with_capacity(ny);
    let mut kick_x = Array2::zeros((ny, nx));
    let mut kick_y = Array2::zeros((ny, nx));
    for i in 0..ny {
        let horizontal = parse_values(
            line(&lines, line_index::horizontal_row(i))?,
            "horizontal kick",
        )?;
        let vertical = parse_values(
            line(&lines, line_index::vertical_row(ny, i))?,
            "vertical kick",
        )?;
        if horizontal.len() != nx + 1 || vertical.len() != nx + 1 {
            return Err(invalid_data(format!(
                "Kick-map row {} does not have {} kick values",
                i, nx
            )));
        }
        y.push(horizontal[0]);
        for j in 0..nx {
            kick_x[(i, j)] = horizontal[j + 1];
            kick_y[(i, j)] = vertical[j + 1];
        }
    }

    io_result!(KickMap::new(id_length, x, y, kick_x, kick_y))
}

/// Reads a kick-map file, decoding it as latin-1.
pub fn read_kick_map<P: AsRef<Path>>(file_path: P) -> io::Result<KickMap> {
    let text = utils::read_latin1_text_file(file_path.as_ref())?;
    parse_kick_map(&text).map_err(|err| {
        invalid_data(format!(
            "Could not parse kick-map {}: {}",
            file_path.as_ref().display(),
            err
        ))
    })
}

/// Writes the given kick-map to a file.
pub fn write_kick_map<P: AsRef<Path>>(kick_map: &KickMap, file_path: P) -> io::Result<()> {
    utils::write_text_file(&format_kick_map(kick_map), file_path)
}
