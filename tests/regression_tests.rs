mod regression;

use idkit::geometry::{Point3, Vec3};
use regression::{assert_field_matches_reference, reference_cassette};

fn cube_cassette() -> idkit::magnet::cassette::HalbachCassette {
    reference_cassette(Vec3::equal_components(0.06), Point3::origin())
}

#[test]
fn cube_cassette_field_above_axis_matches_reference() {
    assert_field_matches_reference(&cube_cassette(), 0.0, 0.08, &regression::CUBE_ABOVE, 1e-9);
}

#[test]
fn cube_cassette_field_beside_axis_matches_reference() {
    assert_field_matches_reference(&cube_cassette(), 0.08, 0.0, &regression::CUBE_BESIDE, 1e-9);
}

#[test]
fn cube_cassette_field_along_diagonal_matches_reference() {
    assert_field_matches_reference(&cube_cassette(), 0.07, 0.07, &regression::CUBE_DIAGONAL, 1e-9);
}

#[test]
fn rectangular_cassette_field_matches_reference() {
    let cassette = reference_cassette(Vec3::new(0.06, 0.08, 0.07), Point3::origin());
    assert_field_matches_reference(&cassette, 0.07, 0.09, &regression::RECTANGLE_DIAGONAL, 1e-9);
}

#[test]
fn horizontally_shifted_cassette_field_matches_reference() {
    let cassette = reference_cassette(Vec3::new(0.06, 0.08, 0.07), Point3::new(0.01, 0.0, 0.0));
    assert_field_matches_reference(&cassette, 0.05, 0.05, &regression::RECTANGLE_SHIFTED_X, 1e-8);
}

#[test]
fn vertically_shifted_cassette_field_matches_reference() {
    let cassette = reference_cassette(Vec3::new(0.06, 0.08, 0.07), Point3::new(0.0, -0.02, 0.0));
    assert_field_matches_reference(&cassette, 0.04, 0.04, &regression::RECTANGLE_SHIFTED_Y, 1e-8);
}
