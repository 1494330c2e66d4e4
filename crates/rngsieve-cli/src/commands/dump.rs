use std::io::Write;

use rngsieve_core::{RngSource, create_generator, resolve_seed};

use super::fail;

const CHUNK_WORDS: usize = 1024;

pub fn run(generator: &str, seed: Option<u64>, words: usize, format: &str, output: Option<&str>) {
    let seed = resolve_seed(seed).unwrap_or_else(|e| fail(e));
    let mut rng = create_generator(generator, seed).unwrap_or_else(|e| fail(e));
    log::info!("dumping {words} words from {} (seed {seed})", rng.name());

    let result = match output {
        Some(path) => match std::fs::File::create(path) {
            Ok(file) => {
                let mut out = std::io::BufWriter::new(file);
                write_words(rng.as_mut(), words, format, &mut out).and_then(|()| out.flush())
            }
            Err(e) => fail(format!("Failed to create {path}: {e}")),
        },
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match write_words(rng.as_mut(), words, format, &mut out) {
                // Broken pipe
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        }
    };
    if let Err(e) = result {
        fail(format!("Write failed: {e}"));
    }
}

/// Write `words` draws, big-endian bytes for "raw" or one 8-digit hex word
/// per line for "hex". `words == 0` streams until the writer fails.
fn write_words(
    rng: &mut dyn RngSource,
    words: usize,
    format: &str,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let mut total = 0usize;
    let mut buf = Vec::with_capacity(CHUNK_WORDS * 9);
    loop {
        if words > 0 && total >= words {
            break;
        }
        let want = if words == 0 {
            CHUNK_WORDS
        } else {
            CHUNK_WORDS.min(words - total)
        };

        buf.clear();
        for _ in 0..want {
            let w = rng.next_u32();
            match format {
                "hex" => buf.extend_from_slice(format!("{w:08x}\n").as_bytes()),
                _ => buf.extend_from_slice(&w.to_be_bytes()),
            }
        }
        out.write_all(&buf)?;
        out.flush()?;
        total += want;
    }
    Ok(())
}
