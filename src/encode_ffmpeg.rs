use std::{
    io::{Read as _, Write as _},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, ExitStatus, Stdio},
    sync::mpsc::{self, SyncSender, TrySendError},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    foundation::core::Rgb8,
    foundation::error::{SwapError, SwapResult},
    render::FrameRGBA,
};

const WAIT_POLL: Duration = Duration::from_millis(20);
/// Frames buffered between the caller and the stdin writer thread.
const PIPE_DEPTH: usize = 2;

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// ffmpeg executable, looked up on `PATH` when not absolute.
    pub program: PathBuf,
}

impl EncodeConfig {
    pub fn validate(&self) -> SwapResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SwapError::encode("encode width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(SwapError::encode("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output needs even dimensions.
            return Err(SwapError::encode(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

pub fn default_mp4_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        out_path: out_path.into(),
        overwrite: true,
        program: PathBuf::from("ffmpeg"),
    }
}

/// Whether `program -version` runs and succeeds.
pub fn is_ffmpeg_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> SwapResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Owns ffmpeg's stdin on a worker thread so the caller never blocks on a full pipe.
struct StdinFeeder {
    tx: SyncSender<Vec<u8>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl StdinFeeder {
    fn spawn(mut stdin: ChildStdin) -> Self {
        let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(PIPE_DEPTH);
        let handle = std::thread::spawn(move || {
            for buf in rx {
                stdin.write_all(&buf)?;
            }
            stdin.flush()
        });
        Self { tx, handle }
    }
}

/// Pipes raw RGBA frames into a system `ffmpeg` producing H.264 MP4.
///
/// The whole encode, from spawn to exit, is bounded by the timeout given to [`Self::new`].
/// On any failure the child is killed and reaped, and its stderr is folded into the error.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    bg_rgb: Rgb8,
    child: Child,
    feeder: Option<StdinFeeder>,
    timeout: Duration,
    deadline: Instant,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, bg_rgb: Rgb8, timeout: Duration) -> SwapResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(SwapError::encode(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        let mut cmd = Command::new(&cfg.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            SwapError::encode(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                cfg.program.display()
            ))
        })?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SwapError::encode("failed to open ffmpeg stdin (unexpected)"));
        };

        Ok(Self {
            cfg,
            bg_rgb,
            child,
            feeder: Some(StdinFeeder::spawn(stdin)),
            timeout,
            deadline: Instant::now() + timeout,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> SwapResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(SwapError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }

        let mut buf = vec![0u8; self.cfg.frame_len()];
        flatten_to_opaque_rgba8(&mut buf, &frame.data, frame.premultiplied, self.bg_rgb)?;

        loop {
            let Some(feeder) = self.feeder.as_ref() else {
                return Err(SwapError::encode("ffmpeg encoder is already finalized"));
            };
            match feeder.tx.try_send(buf) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(back)) => {
                    if Instant::now() >= self.deadline {
                        let reason = self.timed_out();
                        return Err(self.abort(reason));
                    }
                    buf = back;
                    std::thread::sleep(WAIT_POLL);
                }
                Err(TrySendError::Disconnected(_)) => {
                    return Err(self.abort("ffmpeg stopped accepting frames".to_string()));
                }
            }
        }
    }

    /// Closes the input and waits for ffmpeg to exit within the remaining time budget.
    pub fn finish(mut self) -> SwapResult<()> {
        let Some(feeder) = self.feeder.take() else {
            return Err(SwapError::encode("ffmpeg encoder is already finalized"));
        };
        drop(feeder.tx);
        let feeder_handle = feeder.handle;

        while !feeder_handle.is_finished() {
            if Instant::now() >= self.deadline {
                let reason = self.timed_out();
                return Err(self.kill_and_describe(reason, Some(feeder_handle)));
            }
            std::thread::sleep(WAIT_POLL);
        }
        let write_result = feeder_handle
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("ffmpeg stdin writer panicked")));

        let status = match self.wait_until_deadline() {
            Ok(Some(status)) => status,
            Ok(None) => {
                let reason = self.timed_out();
                return Err(self.kill_and_describe(reason, None));
            }
            Err(e) => return Err(self.kill_and_describe(e, None)),
        };

        if !status.success() {
            return Err(SwapError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                self.read_stderr()
            )));
        }
        write_result.map_err(|e| {
            SwapError::encode(format!("failed to write frames to ffmpeg stdin: {e}"))
        })
    }

    fn timed_out(&self) -> String {
        format!(
            "ffmpeg did not finish within {:.1}s",
            self.timeout.as_secs_f64()
        )
    }

    fn wait_until_deadline(&mut self) -> Result<Option<ExitStatus>, String> {
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => return Ok(Some(status)),
                Ok(None) if Instant::now() >= self.deadline => return Ok(None),
                Ok(None) => std::thread::sleep(WAIT_POLL),
                Err(e) => return Err(format!("failed to wait for ffmpeg to finish: {e}")),
            }
        }
    }

    fn abort(&mut self, reason: String) -> SwapError {
        let handle = self.feeder.take().map(|f| {
            drop(f.tx);
            f.handle
        });
        self.kill_and_describe(reason, handle)
    }

    /// Kills and reaps the child, then joins the writer (unblocked by the closed pipe).
    fn kill_and_describe(
        &mut self,
        reason: String,
        feeder: Option<JoinHandle<std::io::Result<()>>>,
    ) -> SwapError {
        let _ = self.child.kill();
        let status = self.child.wait().ok();
        if let Some(handle) = feeder {
            let _ = handle.join();
        }

        let stderr = self.read_stderr();
        tracing::warn!(out = %self.cfg.out_path.display(), %reason, "ffmpeg encode aborted");
        let mut msg = reason;
        if let Some(status) = status {
            msg.push_str(&format!(" (ffmpeg {status})"));
        }
        if !stderr.is_empty() {
            msg.push_str(": ");
            msg.push_str(&stderr);
        }
        SwapError::encode(msg)
    }

    fn read_stderr(&mut self) -> String {
        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        stderr.trim().to_string()
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.feeder.is_some() {
            let _ = self.abort("encoder dropped before finish".to_string());
        }
    }
}

/// Encodes `frames` to `cfg.out_path` in order, bounded by `timeout` overall.
pub fn encode_frames(
    cfg: EncodeConfig,
    frames: &[FrameRGBA],
    bg_rgb: Rgb8,
    timeout: Duration,
) -> SwapResult<()> {
    let mut enc = FfmpegEncoder::new(cfg, bg_rgb, timeout)?;
    for frame in frames {
        enc.encode_frame(frame)?;
    }
    enc.finish()
}

/// Writes an executable shell script standing in for ffmpeg and returns its absolute path.
#[cfg(all(test, unix))]
pub(crate) fn write_fake_ffmpeg(name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = PathBuf::from("target").join("fake_ffmpeg");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::fs::canonicalize(path).unwrap()
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgb: Rgb8,
) -> SwapResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SwapError::encode(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = bg_rgb.map(u16::from);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        for c in 0..3 {
            let sc = u16::from(s[c]);
            let v = if src_is_premul {
                sc + mul_div255(bg[c], inv)
            } else {
                mul_div255(sc, a) + mul_div255(bg[c], inv)
            };
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}
