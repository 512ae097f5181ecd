//! Geometric utility objects.

use crate::num::BFloat;
use approx::{AbsDiffEq, RelativeEq};
use std::{
    fmt, iter,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
            }
        )
    }
}

use Dim3::{X, Y, Z};

/// Denotes the x- or y-dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim2 {
    X = 0,
    Y = 1,
}

impl Dim2 {
    /// Creates an array for iterating over the x- and y-dimensions.
    pub fn slice() -> [Self; 2] {
        [Self::X, Self::Y]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
            }
        )
    }
}

/// Represents any quantity with three dimensional components.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct In3D<T>([T; 3]);

impl<T> In3D<T> {
    /// Creates a new 3D quantity given the three components.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D quantity by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> T,
    {
        Self::new(
            create_component(X),
            create_component(Y),
            create_component(Z),
        )
    }
}

impl<T> Index<Dim3> for In3D<T> {
    type Output = T;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim3> for In3D<T> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<'a, T> IntoIterator for &'a In3D<T> {
    type Item = &'a T;
    type IntoIter = ::std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: AbsDiffEq> AbsDiffEq for In3D<T>
where
    T::Epsilon: Copy,
{
    type Epsilon = <T as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        T::abs_diff_eq(&self[X], &other[X], epsilon)
            && T::abs_diff_eq(&self[Y], &other[Y], epsilon)
            && T::abs_diff_eq(&self[Z], &other[Z], epsilon)
    }
}

impl<T: RelativeEq> RelativeEq for In3D<T>
where
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        T::relative_eq(&self[X], &other[X], epsilon, max_relative)
            && T::relative_eq(&self[Y], &other[Y], epsilon, max_relative)
            && T::relative_eq(&self[Z], &other[Z], epsilon, max_relative)
    }
}

macro_rules! impl_approx_eq_3d {
    ($T:ident <$F:ident>, $SUBT:ty) => {
        impl<$F> AbsDiffEq for $T<$F>
        where
            $F: BFloat + AbsDiffEq,
            $F::Epsilon: Copy,
        {
            type Epsilon = <$SUBT as AbsDiffEq>::Epsilon;

            fn default_epsilon() -> Self::Epsilon {
                <$SUBT>::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                <$SUBT>::abs_diff_eq(&self.0, &other.0, epsilon)
            }
        }

        impl<$F> RelativeEq for $T<$F>
        where
            $F: BFloat + RelativeEq,
            $F::Epsilon: Copy,
        {
            fn default_max_relative() -> Self::Epsilon {
                <$SUBT>::default_max_relative()
            }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                <$SUBT>::relative_eq(&self.0, &other.0, epsilon, max_relative)
            }
        }
    };
}

/// Represents any quantity with two dimensional components.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct In2D<T>([T; 2]);

impl<T> In2D<T> {
    /// Creates a new 2D quantity given the two components.
    pub fn new(x: T, y: T) -> Self {
        Self([x, y])
    }
}

impl<T> Index<Dim2> for In2D<T> {
    type Output = T;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim2> for In2D<T> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

/// A 3D vector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec3<F>(In3D<F>);

impl<F: BFloat> Vec3<F> {
    /// Creates a new 3D vector given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self(In3D::with_each_component(create_component))
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Creates a new vector with all component equal to the given value.
    pub fn equal_components(a: F) -> Self {
        Self::new(a, a, a)
    }

    /// Constructs a new point from the vector components.
    pub fn to_point3(&self) -> Point3<F> {
        Point3::with_each_component(|dim| self[dim])
    }

    /// Constructs a new vector from the absolute values of the vector components.
    pub fn abs(&self) -> Self {
        Self::with_each_component(|dim| self[dim].abs())
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self[X] * self[X] + self[Y] * self[Y] + self[Z] * self[Z]
    }

    /// Computes the length of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Whether any of the components is `NaN`.
    pub fn has_nan(&self) -> bool {
        self[X].is_nan() || self[Y].is_nan() || self[Z].is_nan()
    }

    /// Computes the dot product of the vector with another vector.
    pub fn dot(&self, other: &Self) -> F {
        self[X] * other[X] + self[Y] * other[Y] + self[Z] * other[Z]
    }

    /// Computes the cross product of the vector with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[Y] * other[Z] - self[Z] * other[Y],
            self[Z] * other[X] - self[X] * other[Z],
            self[X] * other[Y] - self[Y] * other[X],
        )
    }

    /// Normalizes the vector to have unit length.
    pub fn normalize(&mut self) {
        let length = self.length();
        assert!(length != F::zero());
        let inv_length = length.recip();
        self[X] = self[X] * inv_length;
        self[Y] = self[Y] * inv_length;
        self[Z] = self[Z] * inv_length;
    }

    /// Returns a normalized copy of the vector.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.normalize();
        normalized
    }
}

impl<F: BFloat> Index<Dim3> for Vec3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Vec3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] + other[X], self[Y] + other[Y], self[Z] + other[Z])
    }
}

impl<F: BFloat> Add<Vec3<F>> for &Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Vec3<F>) -> Self::Output {
        self + &other
    }
}

impl<F: BFloat> Add<Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<F: BFloat> Add<&Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn add(self, other: &Self) -> Self::Output {
        &self + other
    }
}

impl<F: BFloat> AddAssign<&Vec3<F>> for Vec3<F> {
    fn add_assign(&mut self, other: &Self) {
        self[X] = self[X] + other[X];
        self[Y] = self[Y] + other[Y];
        self[Z] = self[Z] + other[Z];
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] - other[X], self[Y] - other[Y], self[Z] - other[Z])
    }
}

impl<F: BFloat> Sub<Vec3<F>> for &Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Vec3<F>) -> Self::Output {
        self - &other
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Sub<&Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn sub(self, other: &Self) -> Self::Output {
        &self - other
    }
}

impl<F: BFloat> Neg for &Vec3<F> {
    type Output = Vec3<F>;
    fn neg(self) -> Self::Output {
        Self::Output::new(-self[X], -self[Y], -self[Z])
    }
}

impl<F: BFloat> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<F: BFloat> Mul<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        Self::Output::new(factor * self[X], factor * self[Y], factor * self[Z])
    }
}

impl<F: BFloat> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, factor: F) -> Self::Output {
        &self * factor
    }
}

impl<F: BFloat> Div<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn div(self, divisor: F) -> Self::Output {
        #![allow(clippy::suspicious_arithmetic_impl)]
        let factor = divisor.recip();
        self * factor
    }
}

impl<F: BFloat> Div<F> for Vec3<F> {
    type Output = Self;
    fn div(self, divisor: F) -> Self::Output {
        &self / divisor
    }
}

impl<'a, F: BFloat> IntoIterator for &'a Vec3<F> {
    type Item = <&'a In3D<F> as IntoIterator>::Item;
    type IntoIter = <&'a In3D<F> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str(")")
    }
}

impl_approx_eq_3d!(Vec3<F>, In3D<F>);

/// A 3D spatial coordinate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Point3<F>(In3D<F>);

impl<F: BFloat> Point3<F> {
    /// Creates a new 3D point given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D point by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self(In3D::with_each_component(create_component))
    }

    /// Creates a new 3D point with all components set to zero.
    pub fn origin() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Constructs a new vector from the point components.
    pub fn to_vec3(&self) -> Vec3<F> {
        Vec3::with_each_component(|dim| self[dim])
    }
}

impl<F: BFloat> Index<Dim3> for Point3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Point3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Sub<&'a Point3<F>> for &'a Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: &Point3<F>) -> Self::Output {
        Self::Output::new(self[X] - other[X], self[Y] - other[Y], self[Z] - other[Z])
    }
}

impl<F: BFloat> Sub<Self> for Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Sub<&Self> for Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: &Self) -> Self::Output {
        &self - other
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Point3<F> {
    type Output = Point3<F>;
    fn add(self, vector: &Vec3<F>) -> Self::Output {
        Self::Output::new(
            self[X] + vector[X],
            self[Y] + vector[Y],
            self[Z] + vector[Z],
        )
    }
}

impl<F: BFloat> Add<Vec3<F>> for Point3<F> {
    type Output = Self;
    fn add(self, vector: Vec3<F>) -> Self::Output {
        &self + &vector
    }
}

impl<F: BFloat> Add<Vec3<F>> for &Point3<F> {
    type Output = Point3<F>;
    fn add(self, vector: Vec3<F>) -> Self::Output {
        self + &vector
    }
}

impl<F: BFloat> Add<&Vec3<F>> for Point3<F> {
    type Output = Self;
    fn add(self, vector: &Vec3<F>) -> Self::Output {
        &self + vector
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Point3<F> {
    type Output = Point3<F>;
    fn sub(self, vector: &Vec3<F>) -> Self::Output {
        Self::Output::new(
            self[X] - vector[X],
            self[Y] - vector[Y],
            self[Z] - vector[Z],
        )
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Point3<F> {
    type Output = Self;
    fn sub(self, vector: Vec3<F>) -> Self::Output {
        &self - &vector
    }
}

impl<'a, F: BFloat> IntoIterator for &'a Point3<F> {
    type Item = <&'a In3D<F> as IntoIterator>::Item;
    type IntoIter = <&'a In3D<F> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Point3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str(")")
    }
}

impl_approx_eq_3d!(Point3<F>, In3D<F>);

/// A 2D vector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec2<F>(In2D<F>);

impl<F: BFloat> Vec2<F> {
    /// Creates a new 2D vector given the two components.
    pub fn new(x: F, y: F) -> Self {
        Self(In2D::new(x, y))
    }
}

impl<F: BFloat> Index<Dim2> for Vec2<F> {
    type Output = F;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim2> for Vec2<F> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

/// A 2D spatial coordinate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Point2<F>(In2D<F>);

impl<F: BFloat> Point2<F> {
    /// Creates a new 2D point given the two components.
    pub fn new(x: F, y: F) -> Self {
        Self(In2D::new(x, y))
    }
}

impl<F: BFloat> Index<Dim2> for Point2<F> {
    type Output = F;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim2> for Point2<F> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

/// A 3x3 matrix stored as three row vectors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Matrix3<F>(In3D<Vec3<F>>);

impl<F: BFloat> Matrix3<F> {
    /// Creates a new matrix from the given three row vectors.
    pub fn from_rows(row_x: Vec3<F>, row_y: Vec3<F>, row_z: Vec3<F>) -> Self {
        Self(In3D::new(row_x, row_y, row_z))
    }

    /// Creates a new matrix by evaluating the given element
    /// constructor for each row and column dimension.
    pub fn with_each_element<C>(create_element: C) -> Self
    where
        C: Fn(Dim3, Dim3) -> F,
    {
        Self(In3D::with_each_component(|row| {
            Vec3::with_each_component(|column| create_element(row, column))
        }))
    }

    /// Creates a new matrix with all elements set to zero.
    pub fn zero() -> Self {
        Self::with_each_element(|_, _| F::zero())
    }

    /// Creates a new identity matrix.
    pub fn identity() -> Self {
        Self::diagonal(F::one(), F::one(), F::one())
    }

    /// Creates a new diagonal matrix with the given diagonal elements.
    pub fn diagonal(xx: F, yy: F, zz: F) -> Self {
        let diag = Vec3::new(xx, yy, zz);
        Self::with_each_element(|row, column| {
            if row == column {
                diag[row]
            } else {
                F::zero()
            }
        })
    }

    /// Creates a matrix for rotating by the given angle (in radians) about the x-axis.
    pub fn rotation_x(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows(
            Vec3::new(F::one(), F::zero(), F::zero()),
            Vec3::new(F::zero(), cos, -sin),
            Vec3::new(F::zero(), sin, cos),
        )
    }

    /// Creates a matrix for rotating by the given angle (in radians) about the y-axis.
    pub fn rotation_y(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows(
            Vec3::new(cos, F::zero(), sin),
            Vec3::new(F::zero(), F::one(), F::zero()),
            Vec3::new(-sin, F::zero(), cos),
        )
    }

    /// Creates a matrix for rotating by the given angle (in radians) about the z-axis.
    pub fn rotation_z(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows(
            Vec3::new(cos, -sin, F::zero()),
            Vec3::new(sin, cos, F::zero()),
            Vec3::new(F::zero(), F::zero(), F::one()),
        )
    }

    /// Creates a matrix for rotating by the given angle (in radians) about
    /// the given axis, using Rodrigues' formula.
    pub fn rotation_about_axis(axis: &Vec3<F>, angle: F) -> Self {
        let u = axis.normalized();
        let (sin, cos) = angle.sin_cos();
        let one_minus_cos = F::one() - cos;
        let cross = Self::from_rows(
            Vec3::new(F::zero(), -u[Z], u[Y]),
            Vec3::new(u[Z], F::zero(), -u[X]),
            Vec3::new(-u[Y], u[X], F::zero()),
        );
        Self::with_each_element(|row, column| {
            let delta = if row == column { F::one() } else { F::zero() };
            delta * cos + cross[(row, column)] * sin + u[row] * u[column] * one_minus_cos
        })
    }

    /// Positive 90 degree rotation about the x-axis.
    pub fn rotx90p() -> Self {
        Self::from_integer_rows([[1, 0, 0], [0, 0, -1], [0, 1, 0]])
    }

    /// Negative 90 degree rotation about the x-axis.
    pub fn rotx90n() -> Self {
        Self::from_integer_rows([[1, 0, 0], [0, 0, 1], [0, -1, 0]])
    }

    /// Positive 90 degree rotation about the y-axis.
    pub fn roty90p() -> Self {
        Self::from_integer_rows([[0, 0, 1], [0, 1, 0], [-1, 0, 0]])
    }

    /// Negative 90 degree rotation about the y-axis.
    pub fn roty90n() -> Self {
        Self::from_integer_rows([[0, 0, -1], [0, 1, 0], [1, 0, 0]])
    }

    /// Positive 90 degree rotation about the z-axis.
    pub fn rotz90p() -> Self {
        Self::from_integer_rows([[0, -1, 0], [1, 0, 0], [0, 0, 1]])
    }

    /// Negative 90 degree rotation about the z-axis.
    pub fn rotz90n() -> Self {
        Self::from_integer_rows([[0, 1, 0], [-1, 0, 0], [0, 0, 1]])
    }

    fn from_integer_rows(rows: [[i8; 3]; 3]) -> Self {
        Self::with_each_element(|row, column| {
            F::from_i8(rows[row.num()][column.num()]).unwrap_or_else(F::nan)
        })
    }

    /// Returns a copy of the given row.
    pub fn row(&self, dim: Dim3) -> Vec3<F> {
        self.0[dim].clone()
    }

    /// Returns a copy of the given column.
    pub fn column(&self, dim: Dim3) -> Vec3<F> {
        Vec3::with_each_component(|row| self[(row, dim)])
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        Self::with_each_element(|row, column| self[(column, row)])
    }

    /// Computes the matrix-vector product.
    pub fn mul_vec(&self, vector: &Vec3<F>) -> Vec3<F> {
        Vec3::with_each_component(|row| self.0[row].dot(vector))
    }

    /// Computes the matrix raised to the given non-negative integer power.
    pub fn powi(&self, exponent: usize) -> Self {
        let mut result = Self::identity();
        let mut base = self.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            remaining >>= 1;
        }
        result
    }

    /// Computes `Q R Q^T`, the matrix expressed in the frame
    /// obtained by applying the orthogonal transformation `Q`.
    pub fn conjugated_by(&self, transformation: &Self) -> Self {
        &(transformation * self) * &transformation.transpose()
    }

    /// Whether any of the elements is `NaN`.
    pub fn has_nan(&self) -> bool {
        Dim3::slice().iter().any(|&row| self.0[row].has_nan())
    }
}

impl<F: BFloat> Index<(Dim3, Dim3)> for Matrix3<F> {
    type Output = F;
    fn index(&self, (row, column): (Dim3, Dim3)) -> &Self::Output {
        &self.0[row][column]
    }
}

impl<F: BFloat> IndexMut<(Dim3, Dim3)> for Matrix3<F> {
    fn index_mut(&mut self, (row, column): (Dim3, Dim3)) -> &mut Self::Output {
        &mut self.0[row][column]
    }
}

impl<'a, F: BFloat> Mul<&'a Matrix3<F>> for &'a Matrix3<F> {
    type Output = Matrix3<F>;
    fn mul(self, other: Self) -> Self::Output {
        Matrix3::with_each_element(|row, column| self.0[row].dot(&other.column(column)))
    }
}

impl<F: BFloat> Mul<Matrix3<F>> for Matrix3<F> {
    type Output = Self;
    fn mul(self, other: Self) -> Self::Output {
        &self * &other
    }
}

impl<'a, F: BFloat> Mul<&'a Vec3<F>> for &'a Matrix3<F> {
    type Output = Vec3<F>;
    fn mul(self, vector: &Vec3<F>) -> Self::Output {
        self.mul_vec(vector)
    }
}

impl<F: BFloat> Mul<F> for &Matrix3<F> {
    type Output = Matrix3<F>;
    fn mul(self, factor: F) -> Self::Output {
        Matrix3::with_each_element(|row, column| self[(row, column)] * factor)
    }
}

impl<'a, F: BFloat> Add<&'a Matrix3<F>> for &'a Matrix3<F> {
    type Output = Matrix3<F>;
    fn add(self, other: Self) -> Self::Output {
        Matrix3::with_each_element(|row, column| self[(row, column)] + other[(row, column)])
    }
}

impl<F: BFloat> AddAssign<&Matrix3<F>> for Matrix3<F> {
    fn add_assign(&mut self, other: &Self) {
        for row in Dim3::slice() {
            self.0[row] += &other.0[row];
        }
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Matrix3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        fmt::Display::fmt(&self.0[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self.0[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self.0[Z], f)?;
        f.write_str("]")
    }
}

impl_approx_eq_3d!(Matrix3<F>, In3D<Vec3<F>>);

/// A polygon in 2D, assumed to be non-intersecting and closed.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplePolygon2<F> {
    vertices: Vec<Point2<F>>,
}

macro_rules! checked_vertex_pair_iter {
    ($vertices:expr) => {
        if $vertices.len() > 2 {
            Some(
                $vertices
                    .iter()
                    .zip($vertices.iter().skip(1).chain(iter::once(&$vertices[0]))),
            )
        } else {
            None
        }
    };
}

impl<F: BFloat> SimplePolygon2<F> {
    /// Creates a new 2D polygon from the given list of vertices.
    pub fn new(vertices: Vec<Point2<F>>) -> Self {
        Self { vertices }
    }

    /// Returns a slice with the vertices of the polygon.
    pub fn vertices(&self) -> &[Point2<F>] {
        &self.vertices
    }

    /// Whether the given point lies inside the polygon, using the even-odd rule.
    ///
    /// Polygons with fewer than three vertices contain no points.
    pub fn contains(&self, point: &Point2<F>) -> bool {
        let (px, py) = (point[Dim2::X], point[Dim2::Y]);
        match checked_vertex_pair_iter!(self.vertices()) {
            Some(pairs) => pairs.fold(false, |inside, (current_vertex, next_vertex)| {
                let (x0, y0) = (current_vertex[Dim2::X], current_vertex[Dim2::Y]);
                let (x1, y1) = (next_vertex[Dim2::X], next_vertex[Dim2::Y]);
                if (y0 > py) != (y1 > py) && px < (x1 - x0) * (py - y0) / (y1 - y0) + x0 {
                    !inside
                } else {
                    inside
                }
            }),
            None => false,
        }
    }
}
