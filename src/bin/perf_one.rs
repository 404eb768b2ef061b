// src/bin/perf_one.rs
// perf_one [LANGUAGE] [FILE]
//
// Time the engine on one input: FILE if given, else PERF_ONE_LEN bytes of
// generated LANGUAGE-flavoured text (default C). PERF_ONE_ALL=1 also runs
// every grammar on its own generated input in parallel.

use std::{env, fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use synhl::{
    config::{env_flag_true, env_u64, env_usize},
    dev::generator::gen_source,
    highlight::{highlight_with, registry},
};

fn fmt_mib(bytes: u64) -> String {
    let mib = (bytes as f64) / (1024.0 * 1024.0);
    format!("{mib:.2} MiB")
}

fn throughput_mibs(bytes: u64, ms: f64) -> f64 {
    if ms <= 0.0 {
        return 0.0;
    }
    (bytes as f64) / (1024.0 * 1024.0) / (ms / 1_000.0)
}

fn main() -> Result<()> {
    let language = env::args().nth(1).unwrap_or_else(|| "C".into());
    let maybe_path = env::args().nth(2);
    let seed = env_u64("PERF_ONE_SEED", 42);
    let target_len = env_usize("PERF_ONE_LEN", 4_000_000);

    let grammar = registry()
        .by_name(&language)
        .with_context(|| format!("no grammar named {language:?}"))?;

    let text = if let Some(path) = maybe_path {
        let p = PathBuf::from(path);
        let load_t0 = Instant::now();
        let src = fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))?;
        let bytes = src.len() as u64;
        println!("Input: file={}  ({} | {} bytes)", p.display(), fmt_mib(bytes), bytes);
        println!("Load:  {:.3} ms", load_t0.elapsed().as_secs_f64() * 1e3);
        src
    } else {
        let gen_t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let src = gen_source(&mut rng, &language, target_len);
        let bytes = src.len() as u64;
        println!(
            "Input: generated {} (len={} | {}) [seed={}]",
            grammar.name(),
            bytes,
            fmt_mib(bytes),
            seed
        );
        println!("Gen:   {:.3} ms", gen_t0.elapsed().as_secs_f64() * 1e3);
        src
    };

    let bytes = text.len() as u64;
    let t0 = Instant::now();
    let html = highlight_with(grammar, &text);
    let ms = t0.elapsed().as_secs_f64() * 1e3;
    println!(
        "{}:  {:.3} ms | out={} | markup x{:.2} | throughput={:.1} MiB/s",
        grammar.name(),
        ms,
        fmt_mib(html.len() as u64),
        html.len() as f64 / (bytes.max(1) as f64),
        throughput_mibs(bytes, ms)
    );

    if env_flag_true("PERF_ONE_ALL", false) {
        let names = registry().names();
        let t_all = Instant::now();
        let rows: Vec<(String, u64, f64)> = names
            .par_iter()
            .filter_map(|name| {
                let g = registry().by_name(name)?;
                let mut rng = StdRng::seed_from_u64(seed);
                let src = gen_source(&mut rng, name, target_len);
                let t0 = Instant::now();
                let _ = highlight_with(g, &src);
                Some((name.to_string(), src.len() as u64, t0.elapsed().as_secs_f64() * 1e3))
            })
            .collect();
        for (name, bytes, ms) in rows {
            println!(
                "  {:<10} {:>10.3} ms | {:.1} MiB/s",
                name,
                ms,
                throughput_mibs(bytes, ms)
            );
        }
        println!("All:   {:.3} ms wall", t_all.elapsed().as_secs_f64() * 1e3);
    }
    Ok(())
}
