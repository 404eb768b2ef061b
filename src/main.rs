// src/main.rs
// synhl [--list] [LANGUAGE] [FILE]
//
// Highlights FILE (or stdin) and writes the marked-up text to stdout.
// Without a LANGUAGE the file extension decides, then SYNHL_LANGUAGE.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use synhl::{config::Settings, highlight::GrammarRegistry};

const USAGE: &str = "usage: synhl [--list] [LANGUAGE] [FILE]";

fn main() -> Result<()> {
    let settings = Settings::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut registry = GrammarRegistry::builtin();
    if let Some(dir) = &settings.grammar_dir {
        registry
            .load_dir(dir)
            .with_context(|| format!("SYNHL_GRAMMAR_DIR={}", dir.display()))?;
    }

    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    if args.iter().any(|a| a == "--list") {
        println!("{}", serde_json::to_string_pretty(&registry.catalog())?);
        return Ok(());
    }

    let (language, file) = match args.as_slice() {
        [] => (None, None),
        [one] if one == "-" || Path::new(one).is_file() => (None, Some(PathBuf::from(one))),
        [one] => (Some(one.clone()), None),
        [lang, file] => (Some(lang.clone()), Some(PathBuf::from(file))),
        _ => bail!("{USAGE}"),
    };
    let file = file.filter(|p| p.as_os_str() != "-");

    let language = language
        .or_else(|| {
            file.as_deref()
                .and_then(|p| registry.for_path(p))
                .map(|g| g.name().to_owned())
        })
        .unwrap_or_else(|| settings.language.clone());

    let bytes = match &file {
        Some(p) => fs::read(p).with_context(|| format!("reading {}", p.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    if registry.by_name(&language).is_none() {
        eprintln!("[synhl] no grammar named {language:?}; output is unchanged");
    }
    let html = registry.highlight(&text, &language);

    let stdout = io::stdout();
    let mut w = stdout.lock();
    if settings.wrap_pre {
        writeln!(w, "<pre class=\"highlight\">{html}</pre>")?;
    } else {
        w.write_all(html.as_bytes())?;
    }
    w.flush()?;
    Ok(())
}
