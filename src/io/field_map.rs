//! Reading and writing field map text files.
//!
//! Data lines contain `x y z bx by bz`, with positions in millimetres and
//! field components in tesla. Lines whose first token is not a number are
//! treated as headers.

use super::utils::{self, invalid_data};
use crate::{
    constants::METRES_PER_MILLIMETRE,
    geometry::{
        Dim3::{X, Y, Z},
        Point3, Vec3,
    },
    magnet::{field_map::FieldSample, fmg},
};
use std::{io, path::Path};

const HEADER: &str = "X[mm]           Y[mm]           Z[mm]           Bx[T]           By[T]           Bz[T]";

/// Parses field samples from the given field map text.
pub fn parse_field_map_samples(text: &str) -> io::Result<Vec<FieldSample>> {
    let mut samples = Vec::new();
    for (line_idx, line) in utils::non_empty_lines(text).enumerate() {
        let mut tokens = line.split_whitespace();
        let first = match tokens.next().map(str::parse::<fmg>) {
            Some(Ok(value)) => value,
            _ => continue,
        };
        let rest = tokens
            .take(5)
            .map(str::parse::<fmg>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                invalid_data(format!(
                    "Invalid number on field map line {}: {}",
                    line_idx + 1,
                    err
                ))
            })?;
        if rest.len() != 5 {
            return Err(invalid_data(format!(
                "Field map line {} has {} values, expected 6",
                line_idx + 1,
                rest.len() + 1
            )));
        }
        samples.push(FieldSample {
            position: Point3::new(
                first * METRES_PER_MILLIMETRE,
                rest[0] * METRES_PER_MILLIMETRE,
                rest[1] * METRES_PER_MILLIMETRE,
            ),
            field: Vec3::new(rest[2], rest[3], rest[4]),
        });
    }
    if samples.is_empty() {
        Err(invalid_data("Field map contains no samples"))
    } else {
        Ok(samples)
    }
}

/// Reads field samples from the given field map file.
pub fn read_field_map_samples<P: AsRef<Path>>(file_path: P) -> io::Result<Vec<FieldSample>> {
    let text = utils::read_latin1_text_file(file_path.as_ref())?;
    parse_field_map_samples(&text).map_err(|err| {
        invalid_data(format!(
            "Could not parse field map {}: {}",
            file_path.as_ref().display(),
            err
        ))
    })
}

/// Formats the given field samples as field map text.
pub fn format_field_map_samples(samples: &[FieldSample]) -> String {
    let mut text = String::with_capacity((samples.len() + 2) * 96);
    text.push_str(HEADER);
    text.push('\n');
    text.push_str(&"-".repeat(HEADER.len()));
    text.push('\n');
    for sample in samples {
        let position = &sample.position;
        let field = &sample.field;
        text.push_str(&format!(
            "{:+.8e} {:+.8e} {:+.8e} {:+.8e} {:+.8e} {:+.8e}\n",
            position[X] / METRES_PER_MILLIMETRE,
            position[Y] / METRES_PER_MILLIMETRE,
            position[Z] / METRES_PER_MILLIMETRE,
            field[X],
            field[Y],
            field[Z]
        ));
    }
    text
}

/// Writes the given field samples to a field map file.
pub fn write_field_map_samples<P: AsRef<Path>>(
    samples: &[FieldSample],
    file_path: P,
) -> io::Result<()> {
    utils::write_text_file(&format_field_map_samples(samples), file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn headers_are_skipped_and_positions_converted_to_metres() {
        let text = "X[mm] Y[mm] Z[mm] Bx By Bz\n----\n\n1.0 -2.0 30.0 0.1 0.2 -0.3\n";
        let samples = parse_field_map_samples(text).unwrap();
        assert_eq!(samples.len(), 1);
        assert_abs_diff_eq!(samples[0].position, Point3::new(1e-3, -2e-3, 3e-2), epsilon = 1e-15);
        assert_abs_diff_eq!(samples[0].field, Vec3::new(0.1, 0.2, -0.3));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(parse_field_map_samples("1.0 2.0 3.0 0.1 0.2\n").is_err());
        assert!(parse_field_map_samples("1.0 2.0 3.0 0.1 x 0.3\n").is_err());
        assert!(parse_field_map_samples("only a header\n").is_err());
    }

    #[test]
    fn formatted_samples_parse_back() {
        let samples = vec![
            FieldSample {
                position: Point3::new(0.001, 0.0, -0.25),
                field: Vec3::new(0.0, 1.25, -3e-5),
            },
            FieldSample {
                position: Point3::new(-0.002, 0.004, 0.5),
                field: Vec3::new(1e-3, 0.0, 0.0),
            },
        ];
        let parsed = parse_field_map_samples(&format_field_map_samples(&samples)).unwrap();
        for (original, parsed) in samples.iter().zip(parsed.iter()) {
            assert_abs_diff_eq!(original.position, parsed.position, epsilon = 1e-12);
            assert_abs_diff_eq!(original.field, parsed.field, epsilon = 1e-12);
        }
    }
}
