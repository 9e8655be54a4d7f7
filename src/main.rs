use std::env;

use viralthumb::{
    logger::{self, LoggerConfig},
    AspectRatio, Config, GenerationRequest, ThumbnailService, TitlesRequest,
};

fn usage() {
    eprintln!("Usage:");
    eprintln!("  viralthumb                         start the HTTP server (PORT, default 8080)");
    eprintln!("  viralthumb generate <prompt> [16:9|9:16|1:1]");
    eprintln!("  viralthumb titles <topic> [language]");
    eprintln!("  viralthumb draft <prompt> [16:9|9:16|1:1]   draft snapshot: image, then a title");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => serve(config).await,
        Some("generate") => {
            let service = ThumbnailService::from_config(&config)?;
            let request = generation_request(&args)?;
            let result = service.generate(&request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Some("titles") => {
            let service = ThumbnailService::from_config(&config)?;
            let topic = args.get(1).ok_or("missing <topic>")?;
            let mut request = TitlesRequest::new(topic.as_str());
            if let Some(language) = args.get(2) {
                request = request.with_language(language.as_str());
            }
            let titles = service.titles(&request).await?;
            println!("{}", serde_json::to_string_pretty(&titles)?);
            Ok(())
        }
        Some("draft") => {
            let service = ThumbnailService::from_config(&config)?;
            let draft = service.draft(&generation_request(&args)?).await?;
            println!("{}", draft.to_json()?);
            Ok(())
        }
        Some(_) => {
            usage();
            Ok(())
        }
    }
}

fn generation_request(args: &[String]) -> Result<GenerationRequest, Box<dyn std::error::Error>> {
    let prompt = args.get(1).ok_or("missing <prompt>")?;
    let aspect_ratio = match args.get(2) {
        Some(raw) => raw.parse::<AspectRatio>()?,
        None => AspectRatio::default(),
    };
    Ok(GenerationRequest::new(prompt.as_str(), aspect_ratio))
}

#[cfg(feature = "server")]
async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    viralthumb::server::serve(config).await?;
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(_config: Config) -> Result<(), Box<dyn std::error::Error>> {
    log::warn!("Built without the `server` feature; nothing to serve");
    usage();
    Ok(())
}
