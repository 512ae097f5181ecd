use idkit::{cli, exit_on_error, kickmap::KickMap};
use lazy_static::lazy_static;
use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

#[macro_export]
macro_rules! def_test {
    (
        OUT[$($out_ident:ident = $out_str:expr),*]
        fn $name:ident $test_body:expr
    ) => {
        #[test]
        fn $name() {
            let test = common::Test::new(stringify!($name));

            $( let $out_ident = test.output_path($out_str); )*

            let test_body = |$( $out_ident, )*| $test_body;

            test_body(
                $( path_str!($out_ident), )*
            );
        }
    };
}

#[macro_export]
macro_rules! path_str {
    ($path:expr) => {
        $path.to_string_lossy().as_ref()
    };
}

pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli::run::run_with_args(COMMAND.clone().get_matches_from(args));
}

pub fn assert_file_exists<P: AsRef<Path>>(file_path: P) {
    let file_path = file_path.as_ref();
    assert!(
        file_path.exists(),
        "File {} does not exist",
        file_path.to_string_lossy()
    );
}

pub fn read_kick_map<P: AsRef<Path>>(file_path: P) -> KickMap {
    exit_on_error!(
        KickMap::read_from_file(file_path),
        "Error: Could not read kick-map file: {}"
    )
}

/// Asserts that two kick-maps have the same coordinates, the same invalid
/// cells and kicks agreeing to the precision of the kick-map file format.
pub fn assert_kick_maps_similar(kick_map_1: &KickMap, kick_map_2: &KickMap) {
    assert_eq!(kick_map_1.nx(), kick_map_2.nx());
    assert_eq!(kick_map_1.ny(), kick_map_2.ny());
    approx::assert_relative_eq!(kick_map_1.id_length(), kick_map_2.id_length());
    for (&x_1, &x_2) in kick_map_1.x().iter().zip(kick_map_2.x()) {
        approx::assert_relative_eq!(x_1, x_2, max_relative = 1e-6);
    }
    for (&y_1, &y_2) in kick_map_1.y().iter().zip(kick_map_2.y()) {
        approx::assert_relative_eq!(y_1, y_2, max_relative = 1e-6);
    }
    for (kicks_1, kicks_2) in [
        (kick_map_1.kick_x(), kick_map_2.kick_x()),
        (kick_map_1.kick_y(), kick_map_2.kick_y()),
    ] {
        for (&kick_1, &kick_2) in kicks_1.iter().zip(kicks_2.iter()) {
            assert_eq!(kick_1.is_nan(), kick_2.is_nan());
            if !kick_1.is_nan() {
                approx::assert_relative_eq!(kick_1, kick_2, epsilon = 1e-15, max_relative = 1e-6);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Test {
    output_dir: PathBuf,
}

impl Test {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        let name = name.as_ref();
        let output_dir = exit_on_error!(
            CONTEXT.prepared_output_dir(name),
            "Error: Could not prepare output directory for test {}: {}",
            name
        );
        Self { output_dir }
    }

    pub fn output_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.output_dir.join(file_name.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct TestContext {
    base_output_dir: PathBuf,
}

impl TestContext {
    const BASE_OUTPUT_DIR_PATH_COMPONENTS: [&'static str; 3] = ["tests", "data", "output"];

    fn new() -> Self {
        Self {
            base_output_dir: Self::BASE_OUTPUT_DIR_PATH_COMPONENTS.iter().collect(),
        }
    }

    pub fn output_dir<S: AsRef<str>>(&self, test_name: S) -> PathBuf {
        self.base_output_dir.join(test_name.as_ref())
    }

    pub fn prepared_output_dir<S: AsRef<str>>(&self, test_name: S) -> io::Result<PathBuf> {
        let output_dir = self.output_dir(test_name);
        if output_dir.exists() {
            fs::remove_dir_all(&output_dir)?;
        }
        fs::create_dir_all(&output_dir)?;
        Ok(output_dir)
    }
}

lazy_static! {
    pub static ref CONTEXT: TestContext = TestContext::new();
    static ref COMMAND: clap::Command<'static> = cli::build::build().no_binary_name(true);
}
