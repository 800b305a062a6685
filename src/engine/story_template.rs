use crate::model::story::{StoryRequest, StoryText};
use crate::model::theme::ThemeId;

/// Which template a theme name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Default,
    Themed(ThemeId),
}

impl Template {
    /// Unknown theme names fall back to the default template.
    pub fn for_theme(theme: &str) -> Self {
        match ThemeId::from_name(theme) {
            Some(theme) => Template::Themed(theme),
            None => Template::Default,
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Template::Default => DEFAULT_STORY,
            Template::Themed(ThemeId::Romance) => ROMANCE_STORY,
            Template::Themed(ThemeId::Drama) => DRAMA_STORY,
            Template::Themed(ThemeId::Mystery) => MYSTERY_STORY,
            Template::Themed(ThemeId::Comedy) => COMEDY_STORY,
            Template::Themed(ThemeId::Tragedy) => TRAGEDY_STORY,
        }
    }
}

/// Fills fixed story templates. Pure: the same request always gives the same text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoryTemplateEngine;

impl StoryTemplateEngine {
    pub fn generate(&self, request: &StoryRequest) -> StoryText {
        let template = Template::for_theme(&request.theme);
        log::debug!("generating story with {template:?} template");
        StoryText::new(fill(template.source(), request))
    }
}

/// Replaces `{field}` and `{field|lower}` placeholders. Unknown placeholders
/// are copied through untouched.
fn fill(template: &str, request: &StoryRequest) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let placeholder = &after[..close];
        let (path, filter) = match placeholder.split_once('|') {
            Some((path, filter)) => (path.trim(), Some(filter.trim())),
            None => (placeholder.trim(), None),
        };

        match (field(request, path), filter) {
            (Some(value), None) => out.push_str(value),
            (Some(value), Some("lower")) => out.push_str(&value.to_lowercase()),
            _ => {
                out.push('{');
                out.push_str(placeholder);
                out.push('}');
            }
        }

        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

fn field<'a>(request: &'a StoryRequest, path: &str) -> Option<&'a str> {
    let value = match path {
        "setting" => &request.setting,
        "theme" => &request.theme,
        "heroine.name" => &request.heroine.name,
        "heroine.personality" => &request.heroine.personality,
        "heroine.status" => &request.heroine.status,
        "hero.name" => &request.hero.name,
        "hero.personality" => &request.hero.personality,
        "hero.status" => &request.hero.status,
        _ => return None,
    };
    Some(value.as_str())
}

const DEFAULT_STORY: &str = concat!(
    "In the elegant society of {setting}, where manners and propriety reigned supreme, ",
    "the {heroine.personality|lower} Miss {heroine.name}, a {heroine.status|lower}, ",
    "found her life taking an unexpected turn.",
    "\n\n",
    "It was during one of Lady Catherine's renowned evening gatherings that she first encountered ",
    "Mr. {hero.name}, a {hero.personality|lower} {hero.status|lower}, ",
    "whose presence caused quite a stir among the local gentry.",
    "\n\n",
    "Through a series of social gatherings and chance encounters, they discovered that first impressions ",
    "are not always to be trusted, and that the heart often has wisdom that reason cannot comprehend.",
    "\n\n",
    "And so, in the time-honored tradition of all good stories, they found that happiness often comes ",
    "not in the way we expect, but in the way that suits us best.",
);

const ROMANCE_STORY: &str = concat!(
    "It is a truth universally acknowledged that no season at {setting} passes without a courtship, ",
    "and this year the gossips had settled upon Miss {heroine.name}, a {heroine.personality|lower} ",
    "{heroine.status|lower} who professed no interest in marriage whatsoever.",
    "\n\n",
    "Mr. {hero.name}, a {hero.personality|lower} {hero.status|lower}, arrived in the spring and was ",
    "declared insufferable by the end of his first dance. Miss {heroine.name} agreed with the verdict, ",
    "and said so rather more often than was necessary.",
    "\n\n",
    "Yet letters were written, misunderstandings were mended, and a long walk in the rain did what ",
    "no ballroom could. When at last he spoke plainly, she found she had been listening all along.",
    "\n\n",
    "They were married at {setting} before the leaves turned, and the gossips claimed to have known it from the start.",
);

const DRAMA_STORY: &str = concat!(
    "The household at {setting} had long been ruled by expectation, and Miss {heroine.name}, a ",
    "{heroine.personality|lower} {heroine.status|lower}, had borne more of it than most.",
    "\n\n",
    "When Mr. {hero.name}, a {hero.personality|lower} {hero.status|lower}, returned after years abroad, ",
    "he brought with him a debt of honour and a secret that threatened every family in the parish.",
    "\n\n",
    "Words were spoken in anger; doors were closed; a carriage left before dawn. For a fortnight the ",
    "whole county held its breath.",
    "\n\n",
    "It was Miss {heroine.name} who finally set matters right, and Mr. {hero.name} who learned, at some ",
    "cost to his pride, that courage is not the exclusive property of gentlemen.",
);

const MYSTERY_STORY: &str = concat!(
    "A letter without a signature arrived at {setting} on the first foggy morning of November, and ",
    "Miss {heroine.name}, a {heroine.personality|lower} {heroine.status|lower}, was the only one who read it twice.",
    "\n\n",
    "Mr. {hero.name}, a {hero.personality|lower} {hero.status|lower} with an unfortunate habit of ",
    "appearing wherever trouble was, insisted the matter was none of her concern. She took this as an invitation.",
    "\n\n",
    "Between a missing miniature, a locked library and a governess who knew too much, the two of them ",
    "uncovered a scheme that had been patiently woven for twenty years.",
    "\n\n",
    "When the truth came out, the neighbourhood was scandalised, and Miss {heroine.name} was quietly ",
    "pleased to have been right about Mr. {hero.name} as well.",
);

const COMEDY_STORY: &str = concat!(
    "No one at {setting} could recall a summer quite so crowded with relations, and Miss {heroine.name}, ",
    "a {heroine.personality|lower} {heroine.status|lower}, had been mistaken for a housekeeper twice before luncheon.",
    "\n\n",
    "Mr. {hero.name}, a {hero.personality|lower} {hero.status|lower}, fared no better: an aunt had ",
    "resolved to marry him to someone, and she was not particular about whom.",
    "\n\n",
    "A borrowed bonnet, a runaway pony and a private theatrical that went entirely to pieces threw them ",
    "together at every turn, to the great entertainment of the servants.",
    "\n\n",
    "By September they had laughed at each other so often that laughing together seemed the only sensible conclusion.",
);

const TRAGEDY_STORY: &str = concat!(
    "The winter came early to {setting}, and with it the news that Miss {heroine.name}, a ",
    "{heroine.personality|lower} {heroine.status|lower}, was promised to a man she had never met.",
    "\n\n",
    "Mr. {hero.name}, a {hero.personality|lower} {hero.status|lower}, had loved her since the summer ",
    "fair, and said nothing, believing his fortune too small to deserve an answer.",
    "\n\n",
    "By the time the truth was spoken the banns had been read, and duty, as it so often does, proved ",
    "stronger than either of them.",
    "\n\n",
    "They met once more at {setting}, years later, and found that a kindness remembered can outlast a great deal of sorrow.",
);
