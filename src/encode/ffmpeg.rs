use std::ffi::OsString;
use std::io::{Read, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Color;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{LexvisError, LexvisResult};
use crate::render::raster::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Color that translucent pixels are flattened onto.
    pub background: Color,
}

impl FfmpegSinkOpts {
    /// Options for writing an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Color::rgb(0, 0, 0),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    running: Option<Encoder>,
}

// A spawned ffmpeg between `begin` and `end`.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    cfg: SinkConfig,
    last_idx: Option<FrameIndex>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned on [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            running: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LexvisResult<()> {
        validate_config(&cfg)?;
        if self.running.is_some() {
            return Err(LexvisError::encode("ffmpeg sink already started"));
        }

        let out = &self.opts.out_path;
        if let Some(dir) = out.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output dir '{}'", dir.display()))?;
        }
        if !self.opts.overwrite && out.exists() {
            return Err(LexvisError::validation(format!(
                "output file '{}' already exists",
                out.display()
            )));
        }
        if !ffmpeg_available() {
            return Err(LexvisError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(&self.opts, &cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LexvisError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(LexvisError::encode("ffmpeg started without piped stdio"));
        };
        // ffmpeg blocks once its stderr pipe fills, so keep reading it.
        let stderr = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::info!(
            out = %out.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.running = Some(Encoder {
            child,
            stdin,
            stderr,
            opaque: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            last_idx: None,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LexvisResult<()> {
        let enc = self
            .running
            .as_mut()
            .ok_or_else(|| LexvisError::encode("ffmpeg sink not started"))?;
        if enc.last_idx.is_some_and(|last| idx.0 <= last.0) {
            return Err(LexvisError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0,
                enc.last_idx.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (enc.cfg.width, enc.cfg.height) {
            return Err(LexvisError::validation(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, enc.cfg.width, enc.cfg.height
            )));
        }
        enc.last_idx = Some(idx);

        flatten_over_background(&mut enc.opaque, frame, self.opts.background)?;
        enc.stdin
            .write_all(&enc.opaque)
            .map_err(|e| LexvisError::encode(format!("failed to pipe frame {}: {e}", idx.0)))?;
        tracing::trace!(frame = idx.0, "frame piped");
        Ok(())
    }

    fn end(&mut self) -> LexvisResult<()> {
        let Encoder {
            mut child,
            stdin,
            stderr,
            ..
        } = self
            .running
            .take()
            .ok_or_else(|| LexvisError::encode("ffmpeg sink not started"))?;
        // Closing stdin is what tells ffmpeg the stream is over.
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| LexvisError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| LexvisError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| LexvisError::encode(format!("failed to read ffmpeg stderr: {e}")))?;
        if !status.success() {
            return Err(LexvisError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }

        tracing::info!(out = %self.opts.out_path.display(), "ffmpeg finished");
        Ok(())
    }
}

fn validate_config(cfg: &SinkConfig) -> LexvisResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(LexvisError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(LexvisError::validation(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    // yuv420p subsamples chroma 2x2.
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(LexvisError::validation(format!(
            "ffmpeg sink needs even dimensions, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

fn ffmpeg_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = format!("{}/{}", cfg.fps.num, cfg.fps.den);
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    // Raw input takes its rate from `-r` before `-i`; h264 + yuv420p plays everywhere.
    let mut args: Vec<OsString> = [
        overwrite,
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        size.as_str(),
        "-r",
        rate.as_str(),
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(opts.out_path.clone().into_os_string());
    args
}

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

// Opaque RGBA8 for ffmpeg: `frame` composited over `bg`.
fn flatten_over_background(dst: &mut [u8], frame: &FrameRGBA, bg: Color) -> LexvisResult<()> {
    if dst.len() != frame.data.len() {
        return Err(LexvisError::validation(
            "frame data size does not match width*height*4",
        ));
    }
    let bg = [bg.r, bg.g, bg.b].map(u16::from);
    for (d, s) in dst.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let src = if frame.premultiplied {
                u16::from(s[c])
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = (src + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
