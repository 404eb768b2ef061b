// src/bin/fuzz_highlight.rs
// Generate random language-flavoured inputs, highlight them with every
// grammar in parallel, and check the output:
//   - determinism: two runs give the same string
//   - content: stripping the markup (and, for XML, the escaping) gives the
//     input back
//   - pass-through: Plain Text output equals the input
// Extras:
//   - FUZZ_SAVE=1 and FUZZ_DIR=... save failing cases (+ .json meta)
//   - FUZZ_INPUT=path [FUZZ_LANG=name] replay a single case
//   - FUZZ_EX_DIR=<dir> handcrafted cases (default "highlight_tests"); the
//     language comes from the extension, and a sidecar `<file>.html`, when
//     present, is the exact expected output.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result, bail};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use synhl::{
    config::{Settings, env_flag_true, env_u64, env_usize},
    dev::{generator::gen_source, markup::recover_source},
    highlight::{PLAIN_TEXT, registry},
};

// ------------------ checks ------------------

fn check_case(src: &str, language: &str) -> Result<(), String> {
    let html = registry().highlight(src, language);
    let again = registry().highlight(src, language);
    if html != again {
        let i = first_divergence(&html, &again);
        return Err(format!("nondeterministic output at byte {i}: {}", window(&html, i)));
    }
    if language.eq_ignore_ascii_case(PLAIN_TEXT) && html != src {
        return Err("Plain Text changed its input".into());
    }
    let back = recover_source(&html, language);
    if back != src {
        let i = first_divergence(&back, src);
        return Err(format!(
            "content not preserved at byte {i}:\n  got:  {}\n  want: {}",
            window(&back, i),
            window(src, i)
        ));
    }
    Ok(())
}

fn first_divergence(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

fn window(s: &str, at: usize) -> String {
    let mut lo = at.saturating_sub(40);
    while !s.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (at + 40).min(s.len());
    while !s.is_char_boundary(hi) {
        hi += 1;
    }
    format!("{:?}", &s[lo..hi])
}

// ------------------ goldens ------------------

fn golden_path(case: &Path) -> PathBuf {
    let mut p = case.as_os_str().to_owned();
    p.push(".html");
    PathBuf::from(p)
}

fn collect_examples(dir: &Path) -> Vec<PathBuf> {
    let Ok(rd) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = rd
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e != "html"))
        .collect();
    out.sort();
    out
}

fn run_example(path: &Path, fallback_language: &str) -> Result<bool> {
    let src = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let language = registry()
        .for_path(path)
        .map(|g| g.name().to_owned())
        .unwrap_or_else(|| fallback_language.to_owned());

    let mut ok = true;
    if let Err(e) = check_case(&src, &language) {
        eprintln!("[ex] {} ({language}): {e}", path.display());
        ok = false;
    }
    let golden = golden_path(path);
    if golden.exists() {
        let want = fs::read_to_string(&golden)
            .with_context(|| format!("reading {}", golden.display()))?;
        let got = registry().highlight(&src, &language);
        if got != want {
            let i = first_divergence(&got, &want);
            eprintln!(
                "[golden] {} mismatch at byte {i}:\n  got:  {}\n  want: {}",
                golden.display(),
                window(&got, i),
                window(&want, i)
            );
            ok = false;
        }
    } else {
        eprintln!("[golden] no sidecar for {}", path.display());
    }
    Ok(ok)
}

// ------------------ save ------------------

/// Seed of one fuzz case; `gen_source` with it and the target length
/// regenerates the input.
fn case_seed(seed: u64, iter: usize) -> u64 {
    seed ^ (iter as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[derive(serde::Serialize)]
struct CaseMeta<'a> {
    unix_ts: u64,
    language: &'a str,
    case_seed: u64,
    iter: usize,
    target_len: usize,
    actual_bytes: usize,
    error: &'a str,
    note: &'a str,
}

fn save_case(
    dir: &Path,
    language: &str,
    case_seed: u64,
    iter: usize,
    target_len: usize,
    src: &str,
    error: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let stem: String = language
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let path = dir.join(format!("case_{stem}_s{case_seed}_i{iter}_n{}.txt", src.len()));
    fs::write(&path, src.as_bytes()).with_context(|| format!("writing {}", path.display()))?;

    let meta = CaseMeta {
        unix_ts: ts,
        language,
        case_seed,
        iter,
        target_len,
        actual_bytes: src.len(),
        error,
        note: "Replay with: FUZZ_INPUT=<this file> FUZZ_LANG=<language> cargo run --bin fuzz_highlight",
    };
    let mut f = fs::File::create(path.with_extension("json"))?;
    writeln!(f, "{}", serde_json::to_string_pretty(&meta)?)?;
    Ok(path)
}

// ------------------ main ------------------

fn main() -> Result<()> {
    let settings = Settings::from_env();

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        let path = PathBuf::from(path);
        let language = std::env::var("FUZZ_LANG").unwrap_or_else(|_| {
            registry()
                .for_path(&path)
                .map(|g| g.name().to_owned())
                .unwrap_or_else(|| settings.language.clone())
        });
        eprintln!("[replay] {} as {language}", path.display());
        let src = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        match check_case(&src, &language) {
            Ok(()) => eprintln!("[replay] OK"),
            Err(e) => bail!("[replay] {e}"),
        }
        return Ok(());
    }

    // --- HANDCRAFTED EXAMPLES (run before fuzzing) ---
    let ex_dir = std::env::var("FUZZ_EX_DIR").unwrap_or_else(|_| "highlight_tests".into());
    let examples = collect_examples(Path::new(&ex_dir));
    if !examples.is_empty() {
        eprintln!("[ex] running {} handcrafted example(s)…", examples.len());
        let mut all_ok = true;
        for p in &examples {
            all_ok &= run_example(p, &settings.language)?;
        }
        if !all_ok {
            bail!("handcrafted examples failed");
        }
    }

    // --- FUZZ MODE ---
    let save_cases = env_flag_true("FUZZ_SAVE", false);
    let out_dir = PathBuf::from(std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".into()));
    let len = env_usize("FUZZ_LEN", 100_000);
    let iters = env_usize("FUZZ_ITERS", 3);
    let seed = env_u64("FUZZ_SEED", 42);

    let languages = registry().names();
    eprintln!(
        "[fuzz] len={len} iters={iters} seed={seed} grammars={}",
        languages.len()
    );

    let jobs: Vec<(&str, usize)> = languages
        .iter()
        .flat_map(|&l| (0..iters).map(move |i| (l, i)))
        .collect();

    let t0 = Instant::now();
    let failures: Vec<(&str, usize, String, String)> = jobs
        .par_iter()
        .filter_map(|&(language, i)| {
            let mut rng = StdRng::seed_from_u64(case_seed(seed, i));
            let src = gen_source(&mut rng, language, len);
            check_case(&src, language)
                .err()
                .map(|e| (language, i, src, e))
        })
        .collect();
    let ms = t0.elapsed().as_millis();

    if failures.is_empty() {
        eprintln!("[fuzz] {} cases passed in {ms} ms ✅", jobs.len());
        return Ok(());
    }

    for (language, i, src, err) in &failures {
        eprintln!("[fuzz] {language} iter {i}: {err}");
        if save_cases {
            let path = save_case(&out_dir, language, case_seed(seed, *i), *i, len, src, err)?;
            eprintln!("[save] wrote {}", path.display());
        }
    }
    bail!("{} of {} fuzz cases failed", failures.len(), jobs.len());
}
