use super::*;
use crate::foundation::core::Fps;

fn frame(px: [u8; 4], premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: px.to_vec(),
        premultiplied,
    }
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30, den: 1 },
    }
}

#[test]
fn opaque_pixels_pass_through() {
    let mut dst = [0u8; 4];
    flatten_over_background(&mut dst, &frame([10, 20, 30, 255], true), Color::WHITE).unwrap();
    assert_eq!(dst, [10, 20, 30, 255]);
}

#[test]
fn transparent_pixels_take_the_background() {
    let mut dst = [0u8; 4];
    let bg = Color::rgb(0x2e, 0x2e, 0x2e);
    flatten_over_background(&mut dst, &frame([0, 0, 0, 0], true), bg).unwrap();
    assert_eq!(dst, [0x2e, 0x2e, 0x2e, 255]);
}

#[test]
fn straight_alpha_is_premultiplied_before_flattening() {
    let mut dst = [0u8; 4];
    flatten_over_background(&mut dst, &frame([255, 255, 255, 128], false), Color::rgb(0, 0, 0))
        .unwrap();
    assert_eq!(dst, [128, 128, 128, 255]);
}

#[test]
fn size_mismatch_is_rejected() {
    let mut dst = [0u8; 8];
    assert!(flatten_over_background(&mut dst, &frame([0; 4], true), Color::WHITE).is_err());
}

#[test]
fn odd_dimensions_are_rejected() {
    assert!(validate_config(&cfg(64, 64)).is_ok());
    assert!(validate_config(&cfg(63, 64)).is_err());
    assert!(validate_config(&cfg(0, 64)).is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("out/never.mp4"));
    assert!(sink.push_frame(FrameIndex(0), &frame([0; 4], true)).is_err());
}

#[test]
fn command_line_streams_raw_rgba_at_the_sink_rate() {
    let mut opts = FfmpegSinkOpts::new("out/demo.mp4");
    let args = ffmpeg_args(&opts, &cfg(640, 360));
    let args: Vec<&str> = args.iter().filter_map(|a| a.to_str()).collect();
    assert_eq!(args[0], "-y");
    let at = |flag: &str| args.iter().position(|a| *a == flag).unwrap();
    assert_eq!(args[at("-s") + 1], "640x360");
    assert_eq!(args[at("-r") + 1], "30/1");
    assert!(at("-r") < at("-i"));
    assert_eq!(args.last(), Some(&"out/demo.mp4"));

    opts.overwrite = false;
    assert_eq!(ffmpeg_args(&opts, &cfg(2, 2))[0], "-n");
}

#[test]
fn end_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("out/never.mp4"));
    assert!(matches!(sink.end(), Err(LexvisError::Encode(_))));
}
