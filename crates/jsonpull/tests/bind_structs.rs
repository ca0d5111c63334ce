#![expect(missing_docs)]

use jsonpull::{
    Context,
    bind::{self, BindError},
    bind_struct,
};

#[derive(Debug, Default, PartialEq)]
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

#[derive(Debug, PartialEq)]
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

#[derive(Debug, Default, PartialEq)]
struct Gltf {
    asset: Asset,
    scenes: Vec<Scene>,
}

bind_struct!(Gltf {
    asset: Asset,
    scenes: Vec<Scene>,
});

const DOCUMENT: &str = r#"
{
    "asset": {
        "generator": "jsonpull",
        "version": "2.0",
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

fn read(document: &str) -> Result<Gltf, BindError> {
    let mut input = document.as_bytes().to_vec();
    bind::from_slice(&mut input)
}

/// Renders a failure the way a command line tool would report it.
fn diagnose(document: &str, error: &BindError) -> String {
    let context = Context::resolve(document.as_bytes(), error.offset());
    format!("{error}\nline {}:\n{context}", context.line_number)
}

#[test]
fn reads_nested_structs() {
    let gltf = read(DOCUMENT).unwrap();
    assert_eq!(
        gltf,
        Gltf {
            asset: Asset {
                generator: "jsonpull".into(),
                version: "2.0".into(),
                num_version: 15,
            },
            scenes: vec![
                Scene {
                    name: "scene A".into(),
                    weight: 15.0,
                    nodes: vec![0, 1, 2, 3, 4],
                    camera: None,
                },
                Scene {
                    name: "scene B".into(),
                    weight: 1.5,
                    nodes: vec![5, 6, 7, 8],
                    camera: Some(5),
                },
            ],
        }
    );
}

#[test]
fn out_of_range_member() {
    let document = DOCUMENT.replace("\"num_version\": 15", "\"num_version\": 70000");
    let error = read(&document).unwrap_err();
    assert_eq!(
        diagnose(&document, &error),
        "$.asset.num_version: value out of range [0, 65535] at byte 100\n\
         line 6:\n        \"num_version\": 70000\n".to_owned()
            + &" ".repeat(23)
            + "^"
    );
}

#[test]
fn missing_member() {
    let document = DOCUMENT.replace("\"nodes\": [5, 6, 7, 8],", "");
    let error = read(&document).unwrap_err();
    let BindError::MissingKey { path, key, .. } = &error else {
        panic!("unexpected error: {error}");
    };
    assert_eq!((path.as_str(), *key), ("$.scenes[1]", "nodes"));
    let context = Context::resolve(document.as_bytes(), error.offset());
    assert_eq!(context.line, "        {");
}

#[test]
fn syntax_error_inside_array() {
    let document = DOCUMENT.replace("[5, 6, 7, 8]", "[5, 6 7, 8,]");
    let error = read(&document).unwrap_err();
    assert!(matches!(error, BindError::Syntax(_)));
    let context = Context::resolve(document.as_bytes(), error.offset());
    assert_eq!(context.line_number, 16);
    assert_eq!(context.line, "            \"nodes\": [5, 6 7, 8,],");
    assert_eq!(&context.line[context.column..], "],");
}
