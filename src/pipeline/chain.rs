use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{Result, ThumbError},
    models::{AspectRatio, AttemptOutcome, ImageReference, ProviderAttempt},
    providers::{ImageProvider, ProviderInfo},
};

/// Last-resort stock photo; every chain run ends here if nothing else works.
pub const STATIC_FALLBACK_URL: &str =
    "https://images.unsplash.com/photo-1626544827763-d516dce335ca?q=80&w=1200&auto=format&fit=crop";

const FALLBACK_PROVIDER: &str = "static-fallback";

/// One entry of an ordered provider list.
pub struct Tier<P: ?Sized> {
    pub provider: Arc<P>,
    pub timeout: Option<Duration>,
}

impl<P: ?Sized> Tier<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl<P: ?Sized> Clone for Tier<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
        }
    }
}

pub struct FirstSuccess<T> {
    /// The winning value and the index of the tier that produced it.
    pub value: Option<(T, usize)>,
    pub attempts: Vec<ProviderAttempt>,
}

/// Tries `tiers` strictly in order and returns the first `Ok`.
///
/// Each call is bounded by its tier's timeout; an elapsed timeout drops the
/// in-flight future. Errors are logged and recorded, never propagated.
pub async fn first_success<'t, P, T, F, Fut>(tiers: &'t [Tier<P>], mut invoke: F) -> FirstSuccess<T>
where
    P: ProviderInfo + ?Sized,
    F: FnMut(&'t P) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = Vec::with_capacity(tiers.len());

    for (index, tier) in tiers.iter().enumerate() {
        let provider: &'t P = tier.provider.as_ref();
        let call = invoke(provider);

        let result = match tier.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(ThumbError::Timeout(limit.as_millis() as u64)),
            },
            None => call.await,
        };

        match result {
            Ok(value) => {
                log::info!("Provider {} ({}) succeeded", provider.name(), provider.model());
                attempts.push(ProviderAttempt {
                    provider: provider.name().to_string(),
                    model: provider.model().to_string(),
                    outcome: AttemptOutcome::Succeeded,
                });
                return FirstSuccess {
                    value: Some((value, index)),
                    attempts,
                };
            }
            Err(e) => {
                log::warn!(
                    "Provider {} ({}) failed, moving to next tier: {}",
                    provider.name(),
                    provider.model(),
                    e
                );
                let outcome = match e {
                    ThumbError::Timeout(_) => AttemptOutcome::TimedOut,
                    other => AttemptOutcome::Failed(other.to_string()),
                };
                attempts.push(ProviderAttempt {
                    provider: provider.name().to_string(),
                    model: provider.model().to_string(),
                    outcome,
                });
            }
        }
    }

    FirstSuccess {
        value: None,
        attempts,
    }
}

#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub image: ImageReference,
    pub provider: String,
    pub used_fallback: bool,
    pub attempts: Vec<ProviderAttempt>,
}

/// Ordered image providers with a static terminal fallback.
#[derive(Clone)]
pub struct ProviderChain {
    tiers: Vec<Tier<dyn ImageProvider>>,
    fallback_url: String,
}

impl Default for ProviderChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ProviderChain {
    pub fn new(tiers: Vec<Tier<dyn ImageProvider>>) -> Self {
        Self {
            tiers,
            fallback_url: STATIC_FALLBACK_URL.to_string(),
        }
    }

    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = url.into();
        self
    }

    pub fn push(&mut self, tier: Tier<dyn ImageProvider>) {
        self.tiers.push(tier);
    }

    pub fn tiers(&self) -> &[Tier<dyn ImageProvider>] {
        &self.tiers
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    /// Never fails: when every tier errors the fallback URL is returned.
    pub async fn run(&self, prompt: &str, aspect_ratio: AspectRatio) -> ChainOutcome {
        let outcome = first_success(&self.tiers, move |provider| async move {
            let image = provider.generate(prompt, aspect_ratio).await?;
            if image.is_empty() {
                return Err(ThumbError::ResponseError("Provider returned an empty image".into()));
            }
            Ok(image)
        })
        .await;

        match outcome.value {
            Some((image, index)) => ChainOutcome {
                image,
                provider: self.tiers[index].provider.name().to_string(),
                used_fallback: false,
                attempts: outcome.attempts,
            },
            None => {
                log::error!(
                    "All {} image providers failed, using static fallback",
                    self.tiers.len()
                );
                ChainOutcome {
                    image: ImageReference::Url(self.fallback_url.clone()),
                    provider: FALLBACK_PROVIDER.to_string(),
                    used_fallback: true,
                    attempts: outcome.attempts,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) enum Behaviour {
        Succeed(ImageReference),
        Fail,
        Hang,
    }

    pub(crate) struct FakeImageProvider {
        pub model: &'static str,
        pub behaviour: Behaviour,
        pub calls: AtomicUsize,
    }

    impl FakeImageProvider {
        pub(crate) fn new(model: &'static str, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                model,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ProviderInfo for FakeImageProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self) -> &str {
            self.model
        }
    }

    #[async_trait]
    impl ImageProvider for FakeImageProvider {
        async fn generate(&self, _prompt: &str, _aspect: AspectRatio) -> Result<ImageReference> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Succeed(image) => Ok(image.clone()),
                Behaviour::Fail => Err(ThumbError::provider("fake", "boom")),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(ThumbError::InternalError("unreachable".into()))
                }
            }
        }
    }

    pub(crate) fn failing_chain() -> ProviderChain {
        ProviderChain::new(vec![
            Tier::new(FakeImageProvider::new("a", Behaviour::Fail) as Arc<dyn ImageProvider>),
            Tier::new(FakeImageProvider::new("b", Behaviour::Fail) as Arc<dyn ImageProvider>),
        ])
    }

    #[tokio::test]
    async fn test_first_success_wins_and_later_tiers_are_skipped() {
        let first = FakeImageProvider::new("first", Behaviour::Fail);
        let second = FakeImageProvider::new(
            "second",
            Behaviour::Succeed(ImageReference::url("https://img/2.png")),
        );
        let third = FakeImageProvider::new(
            "third",
            Behaviour::Succeed(ImageReference::url("https://img/3.png")),
        );
        let chain = ProviderChain::new(vec![
            Tier::new(first.clone() as Arc<dyn ImageProvider>),
            Tier::new(second.clone() as Arc<dyn ImageProvider>),
            Tier::new(third.clone() as Arc<dyn ImageProvider>),
        ]);

        let outcome = chain.run("prompt", AspectRatio::Landscape).await;

        assert_eq!(outcome.image.as_url(), "https://img/2.png");
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.attempts[1].model, "second");
        assert_eq!(third.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failing_yields_static_fallback() {
        let outcome = failing_chain().run("gato astronauta", AspectRatio::Square).await;
        assert_eq!(outcome.image, ImageReference::url(STATIC_FALLBACK_URL));
        assert!(outcome.used_fallback);
        assert_eq!(outcome.attempts.len(), 2);
        assert!(outcome.attempts.iter().all(|a| !a.succeeded()));
    }

    #[tokio::test]
    async fn test_empty_chain_still_yields_image() {
        let outcome = ProviderChain::default().run("", AspectRatio::Portrait).await;
        assert!(!outcome.image.is_empty());
        assert!(outcome.used_fallback);
    }

    #[tokio::test]
    async fn test_empty_image_counts_as_failure() {
        let chain = ProviderChain::new(vec![Tier::new(FakeImageProvider::new(
            "blank",
            Behaviour::Succeed(ImageReference::url("")),
        ) as Arc<dyn ImageProvider>)]);
        let outcome = chain.run("x", AspectRatio::Square).await;
        assert!(outcome.used_fallback);
    }

    #[tokio::test]
    async fn test_tier_timeout_advances_chain() {
        let chain = ProviderChain::new(vec![
            Tier::new(FakeImageProvider::new("slow", Behaviour::Hang) as Arc<dyn ImageProvider>)
                .with_timeout(Duration::from_millis(50)),
            Tier::new(FakeImageProvider::new(
                "fast",
                Behaviour::Succeed(ImageReference::url("https://img/fast.png")),
            ) as Arc<dyn ImageProvider>),
        ]);

        let started = std::time::Instant::now();
        let outcome = chain.run("x", AspectRatio::Landscape).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::TimedOut);
        assert_eq!(outcome.image.as_url(), "https://img/fast.png");
    }
}
