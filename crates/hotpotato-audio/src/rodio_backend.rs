//! Rodio-based playback backend.
//!
//! rodio's `OutputStream` is not `Send`, so the device lives on a dedicated
//! thread and the backend talks to it over a command channel.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::{AudioBackend, AudioChannel, AudioError};

enum AudioCommand {
    Play {
        channel: AudioChannel,
        looping: bool,
        from_start: bool,
        reply: Sender<Result<(), AudioError>>,
    },
    Pause(AudioChannel),
    SetMuted(bool),
    Shutdown,
}

/// One sink per channel, created lazily on first play.
struct Channels {
    loop_track: PathBuf,
    cue_track: PathBuf,
    background: Option<Sink>,
    cue: Option<Sink>,
    muted: bool,
}

impl Channels {
    fn track(&self, channel: AudioChannel) -> &PathBuf {
        match channel {
            AudioChannel::Background => &self.loop_track,
            AudioChannel::Cue => &self.cue_track,
        }
    }

    fn sink_mut(&mut self, channel: AudioChannel) -> &mut Option<Sink> {
        match channel {
            AudioChannel::Background => &mut self.background,
            AudioChannel::Cue => &mut self.cue,
        }
    }

    fn volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            1.0
        }
    }

    fn play(
        &mut self,
        handle: &OutputStreamHandle,
        channel: AudioChannel,
        looping: bool,
        from_start: bool,
    ) -> Result<(), AudioError> {
        let volume = self.volume();
        if !from_start {
            if let Some(sink) = self.sink_mut(channel) {
                if !sink.empty() {
                    sink.set_volume(volume);
                    sink.play();
                    return Ok(());
                }
            }
        }

        let path = self.track(channel).clone();
        let file = File::open(&path).map_err(|e| AudioError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let sink = Sink::try_new(handle).map_err(|e| AudioError::Rejected {
            channel,
            reason: e.to_string(),
        })?;
        sink.set_volume(volume);
        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        if let Some(previous) = self.sink_mut(channel).replace(sink) {
            previous.stop();
        }
        tracing::debug!(%channel, looping, path = %path.display(), "Playback started");
        Ok(())
    }

    fn pause(&mut self, channel: AudioChannel) {
        if let Some(sink) = self.sink_mut(channel) {
            sink.pause();
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let volume = self.volume();
        for sink in [&self.background, &self.cue].into_iter().flatten() {
            sink.set_volume(volume);
        }
    }

    fn stop_all(&mut self) {
        for sink in [self.background.take(), self.cue.take()].into_iter().flatten() {
            sink.stop();
        }
    }
}

fn audio_thread_main(
    rx: Receiver<AudioCommand>,
    mut channels: Channels,
    ready: Sender<Result<(), AudioError>>,
) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(s) => s,
        Err(e) => {
            let _ = ready.send(Err(AudioError::NoDevice(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));
    tracing::info!("Audio output stream opened");

    while let Ok(cmd) = rx.recv() {
        match cmd {
            AudioCommand::Play {
                channel,
                looping,
                from_start,
                reply,
            } => {
                let _ = reply.send(channels.play(&handle, channel, looping, from_start));
            }
            AudioCommand::Pause(channel) => channels.pause(channel),
            AudioCommand::SetMuted(muted) => channels.set_muted(muted),
            AudioCommand::Shutdown => break,
        }
    }

    channels.stop_all();
    tracing::info!("Audio thread exited");
}

/// Plays the loop and cue tracks on the default output device.
pub struct RodioBackend {
    sender: Sender<AudioCommand>,
    thread: Option<JoinHandle<()>>,
}

impl RodioBackend {
    /// Open the default output device on a dedicated thread.
    ///
    /// Fails with [`AudioError::NoDevice`] if no device can be opened.
    pub fn open(loop_track: PathBuf, cue_track: PathBuf) -> Result<Self, AudioError> {
        let (sender, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        let channels = Channels {
            loop_track,
            cue_track,
            background: None,
            cue: None,
            muted: false,
        };
        let thread = thread::Builder::new()
            .name("hotpotato-audio".to_string())
            .spawn(move || audio_thread_main(rx, channels, ready_tx))
            .map_err(|e| AudioError::NoDevice(e.to_string()))?;

        ready_rx.recv().map_err(|_| AudioError::Disconnected)??;

        Ok(Self {
            sender,
            thread: Some(thread),
        })
    }

    fn send(&self, cmd: AudioCommand) -> Result<(), AudioError> {
        self.sender.send(cmd).map_err(|_| AudioError::Disconnected)
    }
}

impl AudioBackend for RodioBackend {
    fn play(&mut self, channel: AudioChannel, looping: bool, from_start: bool) -> Result<(), AudioError> {
        let (reply, response) = mpsc::channel();
        self.send(AudioCommand::Play {
            channel,
            looping,
            from_start,
            reply,
        })?;
        response.recv().map_err(|_| AudioError::Disconnected)?
    }

    fn pause(&mut self, channel: AudioChannel) -> Result<(), AudioError> {
        self.send(AudioCommand::Pause(channel))
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError> {
        self.send(AudioCommand::SetMuted(muted))
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        let _ = self.sender.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
