use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use yt_notes::{
    gemini::GeminiClient,
    narrator::{
        google_tts::GoogleTts,
        merge::{Ffmpeg, FrameConcat},
        SegmentFile,
    },
    openai::OpenAIClient,
    tracing::init_tracing_subscriber,
    translator::google::GoogleTranslate,
    yt::{extract_video_id, scraper::CaptionScraper},
    AudioMerger, Language, MergeError, NotesPipelineBuilder, PipelineOutcome, SpeechSynthesizer,
    TextGenerator,
};

#[derive(Parser)]
#[command(name = "yt-notes", about = "Detailed notes and narration for YouTube videos")]
struct Cli {
    /// YouTube video link; prompted for when omitted
    url: Option<String>,

    /// Language of the notes: English, Hindi or Telugu (name or code)
    #[arg(long, short, env = "NOTES_LANGUAGE", default_value = "English")]
    language: Language,

    /// Google API key for Gemini
    #[arg(long, env = "GOOGLE_API_KEY")]
    google_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_key: Option<String>,

    #[arg(long, value_enum, default_value_t = GeneratorKind::Gemini)]
    generator: GeneratorKind,

    /// Overrides the generator's default model
    #[arg(long)]
    model: Option<String>,

    #[arg(long, value_enum, default_value_t = VoiceKind::Google)]
    voice: VoiceKind,

    /// Voice preset of the OpenAI speech endpoint
    #[arg(long, default_value = OpenAIClient::DEFAULT_VOICE)]
    openai_voice: String,

    #[arg(long, value_enum, default_value_t = MergerKind::Frames)]
    merger: MergerKind,

    /// Directory the audio file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Words per summarization request
    #[arg(long, default_value = "1000")]
    words_per_chunk: usize,

    /// Characters per speech segment
    #[arg(long, default_value = "500")]
    chars_per_chunk: usize,

    /// Preferred caption language; repeat to add fallbacks
    #[arg(long = "transcript-language", default_value = "en")]
    transcript_languages: Vec<String>,

    /// File holding a custom summarization prompt
    #[arg(long)]
    prompt_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeneratorKind {
    Gemini,
    Openai,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VoiceKind {
    Google,
    Openai,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MergerKind {
    Frames,
    Ffmpeg,
}

enum Generator {
    Gemini(GeminiClient),
    OpenAI(OpenAIClient),
}

impl TextGenerator for Generator {
    type Error = anyhow::Error;

    fn model(&self) -> &str {
        match self {
            Generator::Gemini(client) => client.model(),
            Generator::OpenAI(client) => TextGenerator::model(client),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            Generator::Gemini(client) => Ok(client.generate(prompt).await?),
            Generator::OpenAI(client) => Ok(client.generate(prompt).await?),
        }
    }
}

enum Voice {
    Google(GoogleTts),
    OpenAI(OpenAIClient),
}

impl SpeechSynthesizer for Voice {
    type Error = anyhow::Error;

    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, Self::Error> {
        match self {
            Voice::Google(tts) => Ok(tts.synthesize(text, language_code).await?),
            Voice::OpenAI(client) => Ok(client.synthesize(text, language_code).await?),
        }
    }
}

enum Merger {
    Frames(FrameConcat),
    Ffmpeg(Ffmpeg),
}

impl AudioMerger for Merger {
    async fn merge(&self, segments: Vec<SegmentFile>, output: &Path) -> Result<(), MergeError> {
        match self {
            Merger::Frames(merger) => merger.merge(segments, output).await,
            Merger::Ffmpeg(merger) => merger.merge(segments, output).await,
        }
    }
}

struct Config {
    language: Language,
    google_api_key: Option<String>,
    openai_key: Option<String>,
    generator: GeneratorKind,
    model: Option<String>,
    voice: VoiceKind,
    openai_voice: String,
    merger: MergerKind,
    output_dir: PathBuf,
    words_per_chunk: usize,
    chars_per_chunk: usize,
    transcript_languages: Vec<String>,
    instructions: Option<String>,
}

impl Config {
    fn openai_client(&self) -> anyhow::Result<OpenAIClient> {
        let key = self
            .openai_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for OpenAI providers"))?;
        Ok(OpenAIClient::new(key))
    }

    fn generator(&self) -> anyhow::Result<Generator> {
        let generator = match self.generator {
            GeneratorKind::Gemini => {
                let key = self
                    .google_api_key
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("GOOGLE_API_KEY is required for Gemini"))?;
                let mut client = GeminiClient::new(key);
                if let Some(model) = &self.model {
                    client = client.with_model(model);
                }
                Generator::Gemini(client)
            }
            GeneratorKind::Openai => {
                let mut client = self.openai_client()?;
                if let Some(model) = &self.model {
                    client = client.with_chat_model(model);
                }
                Generator::OpenAI(client)
            }
        };
        Ok(generator)
    }

    fn voice(&self) -> anyhow::Result<Voice> {
        Ok(match self.voice {
            VoiceKind::Google => Voice::Google(GoogleTts::default()),
            VoiceKind::Openai => {
                Voice::OpenAI(self.openai_client()?.with_voice(&self.openai_voice))
            }
        })
    }

    fn merger(&self) -> Merger {
        match self.merger {
            MergerKind::Frames => Merger::Frames(FrameConcat),
            MergerKind::Ffmpeg => Merger::Ffmpeg(Ffmpeg::default()),
        }
    }
}

fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter YouTube Video Link: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn run(config: &Config, url: &str) -> anyhow::Result<bool> {
    let generator = config.generator()?;
    tracing::info!(model = generator.model(), language = %config.language, "Generating notes");

    let pipeline = NotesPipelineBuilder::new(&config.output_dir)
        .transcript_provider(CaptionScraper::default())
        .generator(generator)
        .translation_provider(GoogleTranslate::default())
        .synthesizer(config.voice()?)
        .merger(config.merger())
        .with_chunking(config.words_per_chunk, config.chars_per_chunk)
        .transcript_languages(config.transcript_languages.clone());
    let pipeline = match &config.instructions {
        Some(instructions) => pipeline.instructions(instructions.as_str()),
        None => pipeline,
    }
    .build();

    let run = pipeline.run(url, config.language).await;

    match run.outcome {
        PipelineOutcome::Done(output) => {
            if !output.is_localized() {
                eprintln!("Failed to translate notes to {}.", output.requested_language);
            }
            println!("## Detailed Notes ({}):", output.language);
            println!("{}", output.summary);
            println!();

            match &output.audio {
                Some(audio) => println!("Audio saved to {}", audio.path.display()),
                None => println!("No audio was generated."),
            }
            for warning in &output.warnings {
                eprintln!("warning: {warning}");
            }
            Ok(true)
        }
        PipelineOutcome::Aborted { stage, error } => {
            eprintln!("error while {stage}: {error}");
            Ok(false)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let instructions = cli
        .prompt_file
        .as_ref()
        .map(std::fs::read_to_string)
        .transpose()?;

    let config = Config {
        language: cli.language,
        google_api_key: cli.google_api_key,
        openai_key: cli.openai_key,
        generator: cli.generator,
        model: cli.model,
        voice: cli.voice,
        openai_voice: cli.openai_voice,
        merger: cli.merger,
        output_dir: cli.output_dir,
        words_per_chunk: cli.words_per_chunk,
        chars_per_chunk: cli.chars_per_chunk,
        transcript_languages: cli.transcript_languages,
        instructions,
    };

    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    if let Some(video_id) = extract_video_id(&url) {
        println!("Thumbnail: {}", video_id.thumbnail_url());
    }

    if !run(&config, &url).await? {
        // exit skips destructors, flush sentry first
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
