//! Apertures restricting which transverse positions are valid.

use crate::{
    error::{IdkitError, IdkitResult},
    geometry::{
        Dim2::{X, Y},
        Point2, SimplePolygon2,
    },
    grid::fgr,
    io::utils::{self, invalid_data},
};
use std::{fmt, io, path::Path, str::FromStr};

/// Closed-form aperture shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskShape {
    Ellipse,
    Rectangle,
    Diamond,
    None,
}

impl FromStr for MaskShape {
    type Err = IdkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ellipse" => Ok(Self::Ellipse),
            "rectangle" => Ok(Self::Rectangle),
            "diamond" => Ok(Self::Diamond),
            "none" => Ok(Self::None),
            other => Err(IdkitError::invalid(format!("Invalid mask shape {}", other))),
        }
    }
}

impl fmt::Display for MaskShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ellipse => "ellipse",
                Self::Rectangle => "rectangle",
                Self::Diamond => "diamond",
                Self::None => "none",
            }
        )
    }
}

/// A 2D aperture in the transverse plane, centered on the origin.
#[derive(Clone, Debug, PartialEq)]
pub enum Mask {
    Ellipse { width: fgr, height: fgr },
    Rectangle { width: fgr, height: fgr },
    Diamond { width: fgr, height: fgr },
    Table(SimplePolygon2<fgr>),
    None,
}

impl Mask {
    /// Creates a mask that accepts every position.
    pub fn none() -> Self {
        Self::None
    }

    /// Creates a closed-form mask with the given full width and height [m].
    pub fn from_shape(shape: MaskShape, width: fgr, height: fgr) -> IdkitResult<Self> {
        if shape == MaskShape::None {
            return Ok(Self::None);
        }
        crate::ensure_valid!(
            width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "Mask width and height must be positive, got {} and {}",
            width,
            height
        );
        Ok(match shape {
            MaskShape::Ellipse => Self::Ellipse { width, height },
            MaskShape::Rectangle => Self::Rectangle { width, height },
            MaskShape::Diamond => Self::Diamond { width, height },
            MaskShape::None => Self::None,
        })
    }

    /// Creates a closed-form mask from a case-insensitive shape name.
    pub fn from_shape_name(name: &str, width: fgr, height: fgr) -> IdkitResult<Self> {
        Self::from_shape(name.parse()?, width, height)
    }

    /// Creates a mask bounded by the polygon whose vertices are listed in
    /// the given text, one `x y` pair [m] per line. Empty lines and lines
    /// starting with `#` are ignored.
    pub fn from_table_text(text: &str) -> io::Result<Self> {
        let vertices = utils::non_empty_lines(text)
            .filter(|line| !line.starts_with('#'))
            .enumerate()
            .map(|(idx, line)| {
                let values = line
                    .split_whitespace()
                    .map(str::parse::<fgr>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|err| invalid_data(format!("Invalid mask vertex {}: {}", idx, err)))?;
                if values.len() < 2 {
                    return Err(invalid_data(format!(
                        "Mask vertex {} needs two coordinates",
                        idx
                    )));
                }
                Ok(Point2::new(values[0], values[1]))
            })
            .collect::<io::Result<Vec<_>>>()?;
        if vertices.len() < 3 {
            return Err(invalid_data(format!(
                "Mask boundary needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self::Table(SimplePolygon2::new(vertices)))
    }

    /// Reads a mask boundary polygon from the given file.
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> io::Result<Self> {
        let text = utils::read_latin1_text_file(file_path.as_ref())?;
        Self::from_table_text(&text).map_err(|err| {
            invalid_data(format!(
                "Could not read mask file {}: {}",
                file_path.as_ref().display(),
                err
            ))
        })
    }

    /// Whether the given transverse position lies inside the aperture.
    /// Boundary points are inside for the closed-form shapes.
    pub fn is_inside(&self, x: fgr, y: fgr) -> bool {
        match self {
            Self::Ellipse { width, height } => {
                let (u, v) = (2.0 * x / width, 2.0 * y / height);
                u * u + v * v <= 1.0
            }
            Self::Rectangle { width, height } => {
                x.abs() <= 0.5 * width && y.abs() <= 0.5 * height
            }
            Self::Diamond { width, height } => {
                2.0 * x.abs() / width + 2.0 * y.abs() / height <= 1.0
            }
            Self::Table(polygon) => polygon.contains(&Point2::new(x, y)),
            Self::None => true,
        }
    }

    /// Whether the given transverse point lies inside the aperture.
    pub fn contains(&self, point: &Point2<fgr>) -> bool {
        self.is_inside(point[X], point[Y])
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_form_shapes_include_their_boundary() {
        let ellipse = Mask::from_shape_name("Ellipse", 0.02, 0.01).unwrap();
        assert!(ellipse.is_inside(0.01, 0.0));
        assert!(ellipse.is_inside(0.0, -0.005));
        assert!(!ellipse.is_inside(0.008, 0.004));

        let rectangle = Mask::from_shape_name("rectangle", 0.02, 0.01).unwrap();
        assert!(rectangle.is_inside(0.01, -0.005));
        assert!(rectangle.is_inside(0.008, 0.004));
        assert!(!rectangle.is_inside(0.0101, 0.0));

        let diamond = Mask::from_shape_name("DIAMOND", 0.02, 0.01).unwrap();
        assert!(diamond.is_inside(0.005, 0.0025));
        assert!(diamond.is_inside(-0.01, 0.0));
        assert!(!diamond.is_inside(0.006, 0.0025));
    }

    #[test]
    fn none_mask_accepts_everything() {
        let mask = Mask::from_shape_name("none", 0.0, 0.0).unwrap();
        assert_eq!(mask, Mask::none());
        assert!(mask.is_inside(1e3, -1e3));
        assert!(Mask::default().contains(&Point2::new(0.5, 0.5)));
    }

    #[test]
    fn unknown_shape_names_are_invalid_configuration() {
        assert!(matches!(
            Mask::from_shape_name("hexagon", 0.01, 0.01),
            Err(IdkitError::InvalidConfiguration(_))
        ));
        assert!(Mask::from_shape_name("ellipse", 0.0, 0.01).is_err());
    }

    #[test]
    fn table_mask_uses_polygon_boundary() {
        let mask = Mask::from_table_text(
            "# x[m] y[m]\n-0.01 -0.005\n0.01 -0.005\n\n0.0 0.005\n",
        )
        .unwrap();
        assert!(mask.is_inside(0.0, 0.0));
        assert!(!mask.is_inside(0.009, 0.004));
        assert!(!mask.is_inside(0.0, -0.006));
        assert!(Mask::from_table_text("0.0 0.0\n1.0 1.0\n").is_err());
        assert!(Mask::from_table_text("0.0 0.0\n1.0\n1.0 0.0\n").is_err());
    }

    #[test]
    fn table_mask_reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundary.txt");
        std::fs::write(&path, "-1 -1\n1 -1\n1 1\n-1 1\n").unwrap();
        let mask = Mask::from_file(&path).unwrap();
        assert!(mask.is_inside(0.5, -0.5));
        assert!(!mask.is_inside(1.5, 0.0));
        assert!(Mask::from_file(dir.path().join("missing.txt")).is_err());
    }
}
