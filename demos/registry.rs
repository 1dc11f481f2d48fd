use std::path::PathBuf;

use bindarg::{BindingRegistry, ParseError, Record};

#[derive(Debug, Record)]
#[binding(name = "input")]
struct Input {
    #[binding(alias = "i", help = "The file to convert.")]
    source: PathBuf,
    #[binding(default_str = "out")]
    output_dir: PathBuf,
}

#[derive(Debug, Record)]
#[binding(name = "output")]
struct Output {
    #[binding(default_str = "converted", help = "Where the converted files go.")]
    output_dir: PathBuf,
    #[binding(default = true, help = "Overwrite existing files.")]
    overwrite: bool,
}

fn main() -> Result<(), ParseError> {
    let mut registry = BindingRegistry::new();
    registry
        .register::<Input>()
        .register::<Output>()
        .prog("convert")
        .description("Convert a file, writing the result to a directory.");

    let merged = registry.parse_merged();
    assert!(registry.is_empty());

    let input: Input = merged.extract()?;
    let output: Output = merged.extract()?;
    println!(
        "{} -> {} (overwrite: {})",
        input.source.display(),
        output.output_dir.display(),
        output.overwrite
    );
    Ok(())
}
