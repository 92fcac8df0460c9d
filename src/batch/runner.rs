use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::assets::backgrounds::BackgroundPool;
use crate::batch::ids::{BatchId, BatchIdAllocator};
use crate::encode::ffmpeg::FfmpegSink;
use crate::encode::sink::FrameSink;
use crate::foundation::error::TwainResult;
use crate::prompts::{
    MAX_QUESTION_CHARS, PromptCatalog, generate_caption, generate_questions, pick_hook,
};
use crate::provider::TextProvider;
use crate::render::cards::CardRenderer;
use crate::upload::{UploadReport, Uploader, upload_dir};
use crate::video::assembler::{AssemblyStats, VIDEO_FILE_NAME, VideoAssembler};

/// Batches produced by one invocation of the CLI.
pub const DEFAULT_BATCH_COUNT: usize = 10;

pub const CAPTION_FILE_NAME: &str = "caption.txt";

/// Remote prefix batches are uploaded under (`queue/<batch>`).
pub const DEFAULT_UPLOAD_ROOT: &str = "queue";

type SinkFactory<'a> = Box<dyn Fn(&Path) -> Box<dyn FrameSink> + 'a>;

#[derive(Debug)]
pub enum BatchOutcome {
    Completed {
        id: BatchId,
        dir: PathBuf,
        video: Option<AssemblyStats>,
        upload: Option<UploadReport>,
    },
    /// The batch directory exists but holds no cards; its id is consumed.
    Skipped {
        id: BatchId,
        dir: PathBuf,
        reason: String,
    },
}

impl BatchOutcome {
    pub fn id(&self) -> BatchId {
        match self {
            BatchOutcome::Completed { id, .. } | BatchOutcome::Skipped { id, .. } => *id,
        }
    }

    pub fn dir(&self) -> &Path {
        match self {
            BatchOutcome::Completed { dir, .. } | BatchOutcome::Skipped { dir, .. } => dir,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, BatchOutcome::Completed { .. })
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub batches: Vec<BatchOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.batches.iter().filter(|b| b.is_completed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.batches.len() - self.completed()
    }

    /// Files that failed to upload across all batches.
    pub fn upload_failures(&self) -> usize {
        self.batches
            .iter()
            .map(|b| match b {
                BatchOutcome::Completed {
                    upload: Some(report),
                    ..
                } => report.failed.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Drives theme selection, question generation, rendering, assembly and upload for a run of
/// batches. Batches run strictly one after another.
pub struct BatchRunner<'a> {
    output_root: PathBuf,
    text: &'a dyn TextProvider,
    catalog: PromptCatalog,
    renderer: CardRenderer,
    pool: BackgroundPool<'a>,
    assembler: VideoAssembler,
    uploader: Option<&'a dyn Uploader>,
    upload_root: String,
    max_question_chars: usize,
    sink_factory: SinkFactory<'a>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        output_root: impl Into<PathBuf>,
        text: &'a dyn TextProvider,
        catalog: PromptCatalog,
        renderer: CardRenderer,
        pool: BackgroundPool<'a>,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            text,
            catalog,
            renderer,
            pool,
            assembler: VideoAssembler::default(),
            uploader: None,
            upload_root: DEFAULT_UPLOAD_ROOT.to_string(),
            max_question_chars: MAX_QUESTION_CHARS,
            sink_factory: Box::new(|dir: &Path| {
                Box::new(FfmpegSink::new(dir.join(VIDEO_FILE_NAME))) as Box<dyn FrameSink>
            }),
        }
    }

    pub fn with_assembler(mut self, assembler: VideoAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_uploader(mut self, uploader: &'a dyn Uploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_upload_root(mut self, root: impl Into<String>) -> Self {
        self.upload_root = root.into();
        self
    }

    pub fn with_max_question_chars(mut self, max_chars: usize) -> Self {
        self.max_question_chars = max_chars;
        self
    }

    /// Replace the video destination; the factory receives the batch directory.
    pub fn with_sink_factory(
        mut self,
        factory: impl Fn(&Path) -> Box<dyn FrameSink> + 'a,
    ) -> Self {
        self.sink_factory = Box::new(factory);
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Produce `count` batches with ids from `ids`.
    ///
    /// Provider failures skip a batch; render, encode and filesystem failures abort the run.
    #[tracing::instrument(skip(self, ids, rng), fields(root = %self.output_root.display()))]
    pub fn run(
        &mut self,
        count: usize,
        ids: &mut dyn BatchIdAllocator,
        rng: &mut impl rand::Rng,
    ) -> TwainResult<RunReport> {
        std::fs::create_dir_all(&self.output_root)?;
        let pooled = self.pool.ensure_pool(self.pool.target())?;
        info!(pooled, target = self.pool.target(), "background pool ready");

        let mut report = RunReport::default();
        for _ in 0..count {
            let id = ids.next_id()?;
            let outcome = self.run_one(id, rng)?;
            report.batches.push(outcome);
        }
        info!(
            completed = report.completed(),
            skipped = report.skipped(),
            upload_failures = report.upload_failures(),
            "batch generation complete"
        );
        Ok(report)
    }

    fn run_one(&mut self, id: BatchId, rng: &mut impl rand::Rng) -> TwainResult<BatchOutcome> {
        let dir = self.output_root.join(id.dir_name());
        std::fs::create_dir_all(&dir)?;

        let theme = self.catalog.roll(rng)?;
        info!(batch = %id, category = %theme.category, difficulty = %theme.difficulty, "theme rolled");

        let set = match generate_questions(self.text, &theme, self.max_question_chars) {
            Ok(Some(set)) => set,
            Ok(None) => {
                return Ok(skip(id, dir, "fewer than 5 usable questions"));
            }
            Err(err) => {
                warn!(batch = %id, error = %err, retryable = err.is_retryable(), "question generation failed");
                return Ok(skip(id, dir, err.to_string()));
            }
        };

        let hook = pick_hook(rng);
        self.renderer.render_intro(hook, &self.pool, rng, &dir)?;
        for (i, question) in set.questions.iter().enumerate() {
            self.renderer
                .render_question(question, &set.category, i, &dir)?;
        }
        self.renderer.render_outro(&dir)?;

        let caption = generate_caption(self.text);
        std::fs::write(dir.join(CAPTION_FILE_NAME), caption)?;

        let mut sink = (self.sink_factory)(&dir);
        let video = self.assembler.assemble_folder_into(&dir, sink.as_mut())?;
        drop(sink);
        if let Some(stats) = &video {
            info!(batch = %id, frames = stats.frames, duration_secs = stats.duration_secs, "video assembled");
        }

        let upload = self.uploader.map(|up| {
            let prefix = format!("{}/{}", self.upload_root.trim_end_matches('/'), id);
            let report = upload_dir(up, &dir, &prefix);
            if !report.is_complete() {
                warn!(batch = %id, failed = report.failed.len(), "some files were not uploaded");
            }
            report
        });

        info!(batch = %id, dir = %dir.display(), "batch complete");
        Ok(BatchOutcome::Completed {
            id,
            dir,
            video,
            upload,
        })
    }
}

fn skip(id: BatchId, dir: PathBuf, reason: impl Into<String>) -> BatchOutcome {
    let reason = reason.into();
    warn!(batch = %id, %reason, "batch skipped");
    BatchOutcome::Skipped { id, dir, reason }
}
