use std::path::Path;
use std::time::Instant;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::sampling::domain::sample_plan::{SamplePlan, SamplePoint};
use crate::shared::error::{PipelineError, PipelineWarning};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// A decoded frame together with the sample it was taken for.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    pub point: SamplePoint,
    pub frame: Frame,
}

impl SampledFrame {
    pub fn ordinal(&self) -> usize {
        self.point.ordinal
    }

    pub fn frame_index(&self) -> usize {
        self.point.frame_index
    }

    pub fn timestamp(&self) -> f64 {
        self.point.timestamp
    }
}

#[derive(Clone, Debug)]
pub struct SampleReport {
    pub metadata: VideoMetadata,
    pub plan: SamplePlan,
    /// Samples handed to the consumer.
    pub extracted: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Extracts evenly spaced frames from a video.
///
/// Each decoded sample is handed to `on_sample` before the next one is
/// sought, so only one frame is alive at a time. Samples that cannot be
/// seeked to or decoded are skipped with a warning. The reader is closed
/// before `execute` returns, whatever the outcome.
pub struct SampleFramesUseCase {
    reader: Box<dyn VideoReader>,
    logger: Box<dyn PipelineLogger>,
}

impl SampleFramesUseCase {
    pub fn new(reader: Box<dyn VideoReader>, logger: Box<dyn PipelineLogger>) -> Self {
        Self { reader, logger }
    }

    pub fn execute<F>(
        &mut self,
        video: &Path,
        sample_count: usize,
        mut on_sample: F,
    ) -> Result<SampleReport, PipelineError>
    where
        F: FnMut(SampledFrame),
    {
        if sample_count == 0 {
            return Err(PipelineError::InvalidSampleCount);
        }

        let metadata = self
            .reader
            .open(video)
            .map_err(|source| PipelineError::UnopenableVideo {
                path: video.to_path_buf(),
                source,
            })?;

        let result = self.sample(video, metadata, sample_count, &mut on_sample);
        self.reader.close();

        let report = result?;
        self.logger.summary();
        Ok(report)
    }

    fn sample(
        &mut self,
        video: &Path,
        metadata: VideoMetadata,
        sample_count: usize,
        on_sample: &mut dyn FnMut(SampledFrame),
    ) -> Result<SampleReport, PipelineError> {
        if !metadata.is_sampleable() {
            return Err(PipelineError::InvalidVideoMetadata {
                path: video.to_path_buf(),
                fps: metadata.fps(),
                total_frames: metadata.total_frames,
            });
        }

        let plan = SamplePlan::new(metadata.total_frames, metadata.frame_rate, sample_count)?;
        if plan.was_clamped() {
            self.logger.info(&format!(
                "Requested {} samples but the video has only {} frames",
                plan.requested(),
                plan.total_frames()
            ));
        }
        self.logger.info(&format!(
            "Sampling {} of {} frames ({}, every {} frames)",
            plan.count(),
            metadata.total_frames,
            metadata.frame_rate,
            plan.stride()
        ));

        let mut extracted = 0;
        let mut warnings = Vec::new();

        for point in plan.points() {
            let start = Instant::now();
            match self.read_at(point.frame_index) {
                Ok(frame) => {
                    self.logger
                        .timing("extract", start.elapsed().as_secs_f64() * 1000.0);
                    on_sample(SampledFrame {
                        point: *point,
                        frame,
                    });
                    extracted += 1;
                }
                Err(reason) => {
                    let warning = PipelineWarning::Seek {
                        index: point.frame_index,
                        reason,
                    };
                    self.logger.warning(&warning);
                    warnings.push(warning);
                }
            }
            self.logger.progress(point.ordinal + 1, plan.count());
        }

        Ok(SampleReport {
            metadata,
            plan,
            extracted,
            warnings,
        })
    }

    fn read_at(&mut self, frame_index: usize) -> Result<Frame, String> {
        self.reader.seek(frame_index).map_err(|e| e.to_string())?;
        match self.reader.read_frame() {
            Ok(Some(frame)) => Ok(frame),
            Ok(None) => Err("end of stream".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::frame_rate::FrameRate;
    use approx::assert_relative_eq;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    #[derive(Default)]
    struct ReaderLog {
        seeks: Vec<usize>,
        events: Vec<String>,
        closed: bool,
    }

    /// Reports `total_frames` but can only decode the first `decodable`.
    struct StubVideoReader {
        total_frames: usize,
        decodable: usize,
        frame_rate: FrameRate,
        fail_seeks: HashSet<usize>,
        fail_open: bool,
        position: usize,
        log: Arc<Mutex<ReaderLog>>,
    }

    impl StubVideoReader {
        fn new(total_frames: usize, fps: u32) -> (Self, Arc<Mutex<ReaderLog>>) {
            let log = Arc::new(Mutex::new(ReaderLog::default()));
            (
                Self {
                    total_frames,
                    decodable: total_frames,
                    frame_rate: FrameRate::new(fps, 1),
                    fail_seeks: HashSet::new(),
                    fail_open: false,
                    position: 0,
                    log: log.clone(),
                },
                log,
            )
        }
    }

    impl VideoReader for StubVideoReader {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("no such file".into());
            }
            Ok(VideoMetadata {
                width: 4,
                height: 4,
                frame_rate: self.frame_rate,
                total_frames: self.total_frames,
                codec: "h264".to_string(),
                source_path: Some(path.to_path_buf()),
            })
        }

        fn seek(&mut self, frame_index: usize) -> Result<(), Box<dyn std::error::Error>> {
            let mut log = self.log.lock().unwrap();
            log.seeks.push(frame_index);
            log.events.push(format!("seek {frame_index}"));
            drop(log);
            if self.fail_seeks.contains(&frame_index) {
                return Err("seek failed".into());
            }
            self.position = frame_index;
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            if self.position >= self.decodable {
                return Ok(None);
            }
            let frame = Frame::new(vec![0; 4 * 4 * 3], 4, 4, 3, self.position);
            self.position += 1;
            Ok(Some(frame))
        }

        fn close(&mut self) {
            self.log.lock().unwrap().closed = true;
        }
    }

    fn use_case(reader: StubVideoReader) -> SampleFramesUseCase {
        SampleFramesUseCase::new(Box::new(reader), Box::new(NullPipelineLogger))
    }

    fn run(reader: StubVideoReader, sample_count: usize) -> (SampleReport, Vec<SampledFrame>) {
        let mut samples = Vec::new();
        let report = use_case(reader)
            .execute(Path::new("clip.mp4"), sample_count, |s| samples.push(s))
            .unwrap();
        (report, samples)
    }

    fn indices(samples: &[SampledFrame]) -> Vec<usize> {
        samples.iter().map(|s| s.frame_index()).collect()
    }

    // --- Tests ---

    #[test]
    fn test_ten_samples_from_ten_second_video() {
        let (reader, log) = StubVideoReader::new(300, 30);

        let (report, samples) = run(reader, 10);

        assert_eq!(indices(&samples), (0..10).map(|i| i * 30).collect::<Vec<_>>());
        assert_eq!(report.extracted, 10);
        for sample in &samples {
            assert_eq!(sample.frame.index(), sample.frame_index());
        }
        let labels: Vec<String> = samples.iter().map(|s| s.point.label()).collect();
        assert_eq!(labels[0], "0.00s:");
        assert_eq!(labels[9], "9.00s:");
        assert!(report.warnings.is_empty());
        assert!(log.lock().unwrap().closed);
    }

    #[test]
    fn test_timestamps_match_index_over_fps() {
        let (reader, _) = StubVideoReader::new(250, 25);
        let (_, samples) = run(reader, 7);

        for sample in &samples {
            assert_relative_eq!(
                sample.timestamp(),
                sample.frame_index() as f64 / 25.0,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_count_clamped_to_total_frames() {
        let (reader, _) = StubVideoReader::new(4, 30);
        let (report, samples) = run(reader, 10);

        assert!(report.plan.was_clamped());
        assert_eq!(indices(&samples), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_failed_seek_skips_sample() {
        let (mut reader, log) = StubVideoReader::new(100, 10);
        reader.fail_seeks.insert(20);

        let (report, samples) = run(reader, 5);

        assert_eq!(indices(&samples), vec![0, 40, 60, 80]);
        assert_eq!(report.extracted, 4);
        assert_eq!(
            report.warnings,
            vec![PipelineWarning::Seek {
                index: 20,
                reason: "seek failed".to_string()
            }]
        );
        assert_eq!(log.lock().unwrap().seeks, vec![0, 20, 40, 60, 80]);
    }

    #[test]
    fn test_each_sample_is_consumed_before_next_seek() {
        let (reader, log) = StubVideoReader::new(40, 10);
        let sink_log = log.clone();

        use_case(reader)
            .execute(Path::new("clip.mp4"), 4, |s| {
                sink_log
                    .lock()
                    .unwrap()
                    .events
                    .push(format!("sample {}", s.frame_index()));
            })
            .unwrap();

        assert_eq!(
            log.lock().unwrap().events,
            vec![
                "seek 0", "sample 0", "seek 10", "sample 10", "seek 20", "sample 20", "seek 30",
                "sample 30",
            ]
        );
    }

    #[test]
    fn test_end_of_stream_skips_sample() {
        // Container claims more frames than it can decode
        let (mut reader, _) = StubVideoReader::new(100, 10);
        reader.decodable = 50;

        let (report, samples) = run(reader, 4);

        assert_eq!(indices(&samples), vec![0, 25]);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_zero_sample_count_is_rejected_before_open() {
        let (reader, log) = StubVideoReader::new(100, 10);
        let result = use_case(reader).execute(Path::new("clip.mp4"), 0, |_| {});

        assert!(matches!(result, Err(PipelineError::InvalidSampleCount)));
        assert!(log.lock().unwrap().seeks.is_empty());
    }

    #[test]
    fn test_unknown_frame_rate_closes_reader() {
        let (mut reader, log) = StubVideoReader::new(100, 10);
        reader.frame_rate = FrameRate::UNKNOWN;

        let result = use_case(reader).execute(Path::new("clip.mp4"), 3, |_| {});

        assert!(matches!(
            result,
            Err(PipelineError::InvalidVideoMetadata { total_frames: 100, .. })
        ));
        assert!(log.lock().unwrap().closed);
    }

    #[test]
    fn test_zero_frames_is_invalid_metadata() {
        let (reader, log) = StubVideoReader::new(0, 30);
        let result = use_case(reader).execute(Path::new("clip.mp4"), 3, |_| {});

        assert!(matches!(
            result,
            Err(PipelineError::InvalidVideoMetadata { .. })
        ));
        assert!(log.lock().unwrap().closed);
    }

    #[test]
    fn test_unopenable_video() {
        let (mut reader, _) = StubVideoReader::new(100, 10);
        reader.fail_open = true;

        let result = use_case(reader).execute(Path::new("missing.mp4"), 3, |_| {});

        assert!(matches!(
            result,
            Err(PipelineError::UnopenableVideo { path, .. }) if path == Path::new("missing.mp4")
        ));
    }

    #[test]
    fn test_samples_real_video() {
        use crate::video::infrastructure::ffmpeg_reader::tests::create_test_video;
        use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        create_test_video(&path, 30, 160, 120, 10);

        let mut use_case =
            SampleFramesUseCase::new(Box::new(FfmpegReader::new()), Box::new(NullPipelineLogger));
        let mut samples = Vec::new();
        let report = use_case.execute(&path, 3, |s| samples.push(s)).unwrap();

        assert_eq!(report.metadata.total_frames, 30);
        assert_eq!(indices(&samples), vec![0, 10, 20]);
        for sample in &samples {
            assert_eq!(sample.frame.width(), 160);
            assert_eq!(sample.frame.height(), 120);
            assert_eq!(sample.frame.index(), sample.frame_index());
        }
        assert_relative_eq!(samples[2].timestamp(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_file_is_unopenable() {
        use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

        let mut use_case =
            SampleFramesUseCase::new(Box::new(FfmpegReader::new()), Box::new(NullPipelineLogger));
        let result = use_case.execute(Path::new("/nonexistent/clip.mp4"), 3, |_| {});

        assert!(matches!(result, Err(PipelineError::UnopenableVideo { .. })));
    }
}
