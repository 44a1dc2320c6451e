use std::path::PathBuf;

use crate::{
    chunker::{DEFAULT_CHARS_PER_CHUNK, DEFAULT_WORDS_PER_CHUNK},
    llm::{summarizer::Summarizer, TextGenerator},
    narrator::{AudioMerger, Narrator, SpeechSynthesizer},
    translator::{TranslationProvider, Translator},
    yt::{TranscriptFetcher, TranscriptProvider, DEFAULT_TRANSCRIPT_LANGUAGES},
    NotesPipeline,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub words_per_chunk: usize,
    pub chars_per_chunk: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            words_per_chunk: DEFAULT_WORDS_PER_CHUNK,
            chars_per_chunk: DEFAULT_CHARS_PER_CHUNK,
        }
    }
}

pub struct NotesPipelineBuilder<P = (), G = (), T = (), S = (), M = ()> {
    output_dir: PathBuf,
    transcript_provider: P,
    generator: G,
    translation_provider: T,
    synthesizer: S,
    merger: M,
    chunking_config: ChunkingConfig,
    instructions: Option<String>,
    transcript_languages: Vec<String>,
    workspace_root: Option<PathBuf>,
}

impl NotesPipelineBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            transcript_provider: (),
            generator: (),
            translation_provider: (),
            synthesizer: (),
            merger: (),
            chunking_config: ChunkingConfig::default(),
            instructions: None,
            transcript_languages: DEFAULT_TRANSCRIPT_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
            workspace_root: None,
        }
    }
}

impl<P, G, T, S, M> NotesPipelineBuilder<P, G, T, S, M> {
    pub fn transcript_provider<P2: TranscriptProvider>(
        self,
        transcript_provider: P2,
    ) -> NotesPipelineBuilder<P2, G, T, S, M> {
        NotesPipelineBuilder {
            output_dir: self.output_dir,
            transcript_provider,
            generator: self.generator,
            translation_provider: self.translation_provider,
            synthesizer: self.synthesizer,
            merger: self.merger,
            chunking_config: self.chunking_config,
            instructions: self.instructions,
            transcript_languages: self.transcript_languages,
            workspace_root: self.workspace_root,
        }
    }

    pub fn generator<G2: TextGenerator>(self, generator: G2) -> NotesPipelineBuilder<P, G2, T, S, M> {
        NotesPipelineBuilder {
            output_dir: self.output_dir,
            transcript_provider: self.transcript_provider,
            generator,
            translation_provider: self.translation_provider,
            synthesizer: self.synthesizer,
            merger: self.merger,
            chunking_config: self.chunking_config,
            instructions: self.instructions,
            transcript_languages: self.transcript_languages,
            workspace_root: self.workspace_root,
        }
    }

    pub fn translation_provider<T2: TranslationProvider>(
        self,
        translation_provider: T2,
    ) -> NotesPipelineBuilder<P, G, T2, S, M> {
        NotesPipelineBuilder {
            output_dir: self.output_dir,
            transcript_provider: self.transcript_provider,
            generator: self.generator,
            translation_provider,
            synthesizer: self.synthesizer,
            merger: self.merger,
            chunking_config: self.chunking_config,
            instructions: self.instructions,
            transcript_languages: self.transcript_languages,
            workspace_root: self.workspace_root,
        }
    }

    pub fn synthesizer<S2: SpeechSynthesizer>(
        self,
        synthesizer: S2,
    ) -> NotesPipelineBuilder<P, G, T, S2, M> {
        NotesPipelineBuilder {
            output_dir: self.output_dir,
            transcript_provider: self.transcript_provider,
            generator: self.generator,
            translation_provider: self.translation_provider,
            synthesizer,
            merger: self.merger,
            chunking_config: self.chunking_config,
            instructions: self.instructions,
            transcript_languages: self.transcript_languages,
            workspace_root: self.workspace_root,
        }
    }

    pub fn merger<M2: AudioMerger>(self, merger: M2) -> NotesPipelineBuilder<P, G, T, S, M2> {
        NotesPipelineBuilder {
            output_dir: self.output_dir,
            transcript_provider: self.transcript_provider,
            generator: self.generator,
            translation_provider: self.translation_provider,
            synthesizer: self.synthesizer,
            merger,
            chunking_config: self.chunking_config,
            instructions: self.instructions,
            transcript_languages: self.transcript_languages,
            workspace_root: self.workspace_root,
        }
    }

    pub fn with_chunking(mut self, words_per_chunk: usize, chars_per_chunk: usize) -> Self {
        self.chunking_config = ChunkingConfig {
            words_per_chunk,
            chars_per_chunk,
        };
        self
    }

    /// Replaces the default notes prompt.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Caption languages to request, most preferred first.
    pub fn transcript_languages<I, L>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.transcript_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Parent directory of the narrator's temporary segment directories.
    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }
}

impl<P, G, T, S, M> NotesPipelineBuilder<P, G, T, S, M>
where
    P: TranscriptProvider,
    G: TextGenerator,
    T: TranslationProvider,
    S: SpeechSynthesizer,
    M: AudioMerger,
{
    pub fn build(self) -> NotesPipeline<P, G, T, S, M> {
        let mut summarizer = Summarizer::new(self.generator)
            .with_words_per_chunk(self.chunking_config.words_per_chunk);
        if let Some(instructions) = self.instructions {
            summarizer = summarizer.with_instructions(instructions);
        }

        let mut narrator = Narrator::new(self.synthesizer, self.merger)
            .with_chars_per_chunk(self.chunking_config.chars_per_chunk);
        if let Some(root) = self.workspace_root {
            narrator = narrator.with_workspace_root(root);
        }

        NotesPipeline {
            output_dir: self.output_dir,
            transcript_languages: self.transcript_languages,
            fetcher: TranscriptFetcher::new(self.transcript_provider),
            summarizer,
            translator: Translator::new(self.translation_provider),
            narrator,
        }
    }
}
