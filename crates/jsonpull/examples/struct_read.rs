//! Reads a small scene description into typed structs.
//!
//! Pass a path to read that file instead of the built-in document. On failure
//! the offending line is printed with a caret under the fault.

use std::{env, fs, process::ExitCode};

use jsonpull::{Context, bind, bind_struct};

#[derive(Debug, Default)]
struct Asset {
    generator: String,
    version: String,
    num_version: u16,
}

bind_struct!(Asset {
    generator: String,
    version: String,
    num_version: u16,
});

#[derive(Debug)]
struct Scene {
    name: String,
    weight: f32,
    nodes: Vec<usize>,
    camera: Option<usize>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: 15.0,
            nodes: Vec::new(),
            camera: None,
        }
    }
}

bind_struct!(Scene {
    name: String,
    #[optional] weight: f32,
    nodes: Vec<usize>,
    camera: Option<usize>,
});

#[derive(Debug, Default)]
struct Gltf {
    asset: Asset,
    scenes: Vec<Scene>,
}

bind_struct!(#[ignore_unknown] Gltf {
    asset: Asset,
    scenes: Vec<Scene>,
});

const DOCUMENT: &str = r#"
{
    "asset": {
        "generator": "joel",
        "version": "6.9",
        "num_version": 15
    },
    "scenes": [
        {
            "name": "scene A",
            "nodes": [0, 1, 2, 3, 4]
        },
        {
            "name": "scene B",
            "weight": 1.5,
            "nodes": [5, 6, 7, 8],
            "camera": 5
        }
    ]
}
"#;

fn main() -> ExitCode {
    let original = match env::args_os().nth(1) {
        Some(path) => match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) => {
                eprintln!("Error: cannot read {}: {error}", path.to_string_lossy());
                return ExitCode::FAILURE;
            }
        },
        None => DOCUMENT.as_bytes().to_vec(),
    };

    // Binding decodes strings in place; keep the original for diagnostics.
    let mut input = original.clone();
    match bind::from_slice::<Gltf>(&mut input) {
        Ok(gltf) => {
            println!("{gltf:#?}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let context = Context::resolve(&original, error.offset());
            eprintln!("Error: {error}");
            eprintln!("Line {}", context.line_number);
            eprintln!("{context}");
            ExitCode::FAILURE
        }
    }
}
