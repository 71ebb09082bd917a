//! Reads a configuration file and prints it as SCON with type annotations.
//!
//! Run with: cargo run --example dump -- <file> [include-dir ...]
//!
//! The format is chosen from the file extension (.conf/.config/.cfg/.scon,
//! .ini, .xml). SCON includes are searched in the file's own directory first,
//! then in the given include directories.

use std::env;
use std::error::Error;
use std::path::Path;
use variant_tree::{
    read_config_file, to_scon_string, IncludeDirs, SconWriterSettings, VariantTree, XmlFlags,
};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let Some(file) = args.next() else {
        eprintln!("usage: dump <file> [include-dir ...]");
        std::process::exit(2);
    };

    let own_dir = Path::new(&file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let resolver = args.fold(IncludeDirs::new([own_dir]), IncludeDirs::push);

    let mut tree = VariantTree::new();
    read_config_file(&file, &mut tree, &resolver, XmlFlags::TRIM_WHITESPACE)?;

    let settings = SconWriterSettings::new().with_show_types(true);
    print!("{}", to_scon_string(&tree, &settings));
    Ok(())
}
