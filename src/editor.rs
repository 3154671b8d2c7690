//! AI assists applied to a post draft before it is saved.

use std::fmt;

use crate::genai::{self, GenerationError, Generator};
use crate::model::PostFields;
use crate::validate::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assist {
    Article,
    Seo,
    Summary,
    Image,
}

impl fmt::Display for Assist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Assist::Article => "article",
            Assist::Seo => "SEO suggestions",
            Assist::Summary => "summary",
            Assist::Image => "thumbnail",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to upload image: {0:#}")]
    Upload(anyhow::Error),
}

/// Requested assists. They run in a fixed order (article, SEO, summary,
/// image) so later steps see what earlier ones produced.
#[derive(Debug, Clone, Default)]
pub struct Assists {
    pub article_topic: Option<String>,
    pub seo: bool,
    pub summary: bool,
    pub image: bool,
}

impl Assists {
    pub fn is_empty(&self) -> bool {
        self.article_topic.is_none() && !self.seo && !self.summary && !self.image
    }
}

/// Run every requested assist on `draft`.
///
/// A failing step leaves the draft as it was and does not stop the steps
/// after it; the failures are returned for the caller to report.
pub fn apply<G, U>(
    draft: &mut PostFields,
    assists: &Assists,
    generator: &G,
    mut upload: U,
) -> Vec<(Assist, AssistError)>
where
    G: Generator + ?Sized,
    U: FnMut(Vec<u8>) -> anyhow::Result<String>,
{
    let mut failures = Vec::new();

    if let Some(topic) = &assists.article_topic
        && let Err(e) = article(draft, topic, generator)
    {
        failures.push((Assist::Article, e));
    }
    if assists.seo
        && let Err(e) = seo(draft, generator)
    {
        failures.push((Assist::Seo, e));
    }
    if assists.summary
        && let Err(e) = summary(draft, generator)
    {
        failures.push((Assist::Summary, e));
    }
    if assists.image
        && let Err(e) = image(draft, generator, &mut upload)
    {
        failures.push((Assist::Image, e));
    }
    failures
}

fn article<G: Generator + ?Sized>(
    draft: &mut PostFields,
    topic: &str,
    generator: &G,
) -> Result<(), AssistError> {
    let topic = validate::required("topic", topic)?;
    let article = genai::write_article(generator, topic)?;
    draft.title = article.title;
    draft.content = article.content;
    draft.meta_description = article.meta_description;
    draft.keywords = article.keywords;
    Ok(())
}

fn seo<G: Generator + ?Sized>(draft: &mut PostFields, generator: &G) -> Result<(), AssistError> {
    let content = validate::required("content", &draft.content)?;
    let seo = genai::suggest_seo(generator, content)?;
    draft.title = seo.seo_title;
    draft.meta_description = seo.meta_description;
    draft.keywords = seo.keywords;
    Ok(())
}

fn summary<G: Generator + ?Sized>(
    draft: &mut PostFields,
    generator: &G,
) -> Result<(), AssistError> {
    let content = validate::required("content", &draft.content)?;
    draft.summary = genai::summarize(generator, content)?;
    Ok(())
}

fn image<G, U>(draft: &mut PostFields, generator: &G, upload: &mut U) -> Result<(), AssistError>
where
    G: Generator + ?Sized,
    U: FnMut(Vec<u8>) -> anyhow::Result<String>,
{
    let title = validate::required("title", &draft.title)?;
    let bytes = genai::thumbnail(generator, title)?;
    draft.image_url = upload(bytes).map_err(AssistError::Upload)?;
    Ok(())
}
