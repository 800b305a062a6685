use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::engine::audio::{AudioError, MusicBackend};

/// Default audio device. The stream must outlive every sink created from it.
pub struct RodioMusic {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioMusic {
    pub fn open() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            log::warn!("no audio output: {e}");
            AudioError::OutputUnavailable
        })?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }
}

impl MusicBackend for RodioMusic {
    fn play_looping(&mut self, track: &Path) -> Result<(), AudioError> {
        self.stop();

        let unplayable = |reason: String| AudioError::Unplayable {
            path: track.to_path_buf(),
            reason,
        };

        let file = File::open(track).map_err(|e| unplayable(e.to_string()))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| unplayable(e.to_string()))?;
        let sink = Sink::try_new(&self.handle).map_err(|e| unplayable(e.to_string()))?;

        sink.append(source.repeat_infinite());
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
