use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::collections::VecDeque;

pub struct MicCapture {
    _stream: cpal::Stream, // must stay alive or capture stops
    consumer: HeapConsumer<f32>,
    window: VecDeque<f32>, // latest `size` samples
    size: usize,
    pub sample_rate: u32,
}

impl MicCapture {
    pub fn start(size: usize) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("No microphone input device found"))?;
        if let Ok(name) = device.name() {
            log::info!("capturing from {name}");
        }

        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        // 8x the window so the callback never stalls between frames
        let (producer, consumer) = HeapRb::<f32>::new(size * 8).split();

        let stream = build_stream(&device, &config, format, channels, producer)?;
        stream.play()?;

        Ok(Self {
            _stream: stream,
            consumer,
            window: VecDeque::from(vec![0.0f32; size]),
            size,
            sample_rate,
        })
    }

    /// Drains captured samples and copies the latest window into `out`.
    /// Returns how many new samples arrived since the last call.
    pub fn read_window(&mut self, out: &mut Vec<f32>) -> usize {
        let mut fresh = 0;
        while let Some(s) = self.consumer.pop() {
            self.window.push_back(s);
            if self.window.len() > self.size {
                self.window.pop_front();
            }
            fresh += 1;
        }
        out.clear();
        out.extend(self.window.iter().copied());
        out.resize(self.size, 0.0);
        fresh
    }
}

fn mic_err(e: cpal::StreamError) {
    log::warn!("mic stream error: {e}");
}

fn push_mono<T: Copy>(
    data: &[T],
    channels: usize,
    producer: &mut HeapProducer<f32>,
    to_f32: impl Fn(T) -> f32,
) {
    for frame in data.chunks(channels) {
        let mono = frame.iter().map(|&s| to_f32(s)).sum::<f32>() / channels as f32;
        let _ = producer.push(mono);
    }
}

/// `producer` is moved into exactly one callback closure.
fn build_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    format: cpal::SampleFormat,
    channels: usize,
    mut producer: HeapProducer<f32>,
) -> anyhow::Result<cpal::Stream> {
    Ok(match format {
        cpal::SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _| push_mono(data, channels, &mut producer, |s| s),
            mic_err,
            None,
        )?,
        cpal::SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _| {
                push_mono(data, channels, &mut producer, |s| s as f32 / i16::MAX as f32)
            },
            mic_err,
            None,
        )?,
        cpal::SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _| {
                push_mono(data, channels, &mut producer, |s| {
                    (s as f32 - 32_768.0) / 32_768.0
                })
            },
            mic_err,
            None,
        )?,
        _ => anyhow::bail!("Unsupported mic sample format: {:?}", format),
    })
}
