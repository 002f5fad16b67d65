//! FFmpeg-backed local file source.

use {
    crate::{RawFrame, VideoError, VideoSource},
    ffmpeg_next as ffmpeg,
};

pub struct FfmpegSource {
    path: String,
    // dropped on release, so the demuxer/decoder handles go with it
    state: Option<DecodeState>,
}

struct DecodeState {
    input: ffmpeg::format::context::Input,
    stream_index: usize,
    decoder: ffmpeg::codec::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    eof_sent: bool,
}

impl FfmpegSource {
    pub fn open(path: &str) -> Result<Self, VideoError> {
        ffmpeg::init().map_err(|e| VideoError::Open(format!("initialize ffmpeg: {e}")))?;

        let input = ffmpeg::format::input(&path)
            .map_err(|e| VideoError::Open(format!("cannot open '{path}': {e}")))?;
        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| VideoError::Open(format!("'{path}' has no video track")))?;
        let stream_index = stream.index();

        let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| VideoError::Open(format!("load decoder parameters: {e}")))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| VideoError::Open(format!("open video decoder: {e}")))?;

        let scaler = ffmpeg::software::scaling::context::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg::util::format::pixel::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ffmpeg::software::scaling::flag::Flags::BILINEAR,
        )
        .map_err(|e| VideoError::Open(format!("create scaler: {e}")))?;

        log::info!("opened '{path}' ({}x{})", decoder.width(), decoder.height());

        Ok(Self {
            path: path.to_string(),
            state: Some(DecodeState {
                input,
                stream_index,
                decoder,
                scaler,
                eof_sent: false,
            }),
        })
    }
}

impl VideoSource for FfmpegSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(None);
        };

        let mut decoded = ffmpeg::frame::Video::empty();
        loop {
            if state.decoder.receive_frame(&mut decoded).is_ok() {
                return state.to_rgb(&decoded).map(Some);
            }
            if state.eof_sent {
                // decoder fully drained
                return Ok(None);
            }

            // feed the next packet from the video stream, or flush at EOF
            let mut fed = false;
            for (stream, packet) in state.input.packets() {
                if stream.index() != state.stream_index {
                    continue;
                }
                state
                    .decoder
                    .send_packet(&packet)
                    .map_err(|e| VideoError::Decode(format!("send packet: {e}")))?;
                fed = true;
                break;
            }
            if !fed {
                let _ = state.decoder.send_eof();
                state.eof_sent = true;
            }
        }
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            log::info!("released '{}'", self.path);
        }
    }
}

impl DecodeState {
    fn to_rgb(&mut self, decoded: &ffmpeg::frame::Video) -> Result<RawFrame, VideoError> {
        let mut rgb = ffmpeg::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgb)
            .map_err(|e| VideoError::Decode(format!("scale to RGB: {e}")))?;

        let width = rgb.width();
        let height = rgb.height();
        let row_bytes = width as usize * 3;
        let stride = rgb.stride(0);
        let plane = rgb.data(0);

        // rows may be padded; copy them tightly packed
        let mut data = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            data.extend_from_slice(&plane[start..start + row_bytes]);
        }

        Ok(RawFrame::new(width, height, data))
    }
}
