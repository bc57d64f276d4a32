use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// Shape the model is told to answer in: a `score:` line followed by a
// free-form `description:` body. The number grammar accepts `0`, `0.0`
// and positive numbers with a non-zero leading digit; `07` does not
// match.
static REPLY_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"score: (?P<score>(?:0|[1-9][0-9]*)(?:\.[0-9]+)?)\ndescription: (?P<description>(?s:.*))",
    )
    .expect("reply format regex")
});

/// A completion reply reduced to its two fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The reply did not contain the score/description pair at all.
    #[error("no score/description pair in reply")]
    NoMatch,
    /// The score field matched the pattern but did not survive numeric
    /// conversion.
    #[error("invalid score {0}")]
    InvalidScore(String),
}

pub fn parse_reply(raw: &str) -> Result<Reply, ParseError> {
    let caps = REPLY_FORMAT.captures(raw).ok_or(ParseError::NoMatch)?;

    let raw_score = caps.name("score").map_or("", |m| m.as_str());
    let score: f64 = raw_score
        .parse()
        .map_err(|_| ParseError::InvalidScore(raw_score.to_string()))?;
    if score.is_nan() {
        return Err(ParseError::InvalidScore(raw_score.to_string()));
    }

    let body = caps.name("description").map_or("", |m| m.as_str());
    let description = body.strip_suffix("````").unwrap_or(body).trim().to_string();

    Ok(Reply { score, description })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_score() {
        let reply = parse_reply("score: 85\ndescription: looks solid").unwrap();
        assert_eq!(reply.score, 85.0);
        assert_eq!(reply.description, "looks solid");
    }

    #[test]
    fn parses_zero_and_fractional_scores() {
        assert_eq!(parse_reply("score: 0\ndescription: fine").unwrap().score, 0.0);
        assert_eq!(parse_reply("score: 0.0\ndescription: fine").unwrap().score, 0.0);
        assert_eq!(parse_reply("score: 72.5\ndescription: ok").unwrap().score, 72.5);
    }

    #[test]
    fn rejects_leading_zero_integers() {
        assert_eq!(parse_reply("score: 07\ndescription: x"), Err(ParseError::NoMatch));
        assert_eq!(parse_reply("score: 01\ndescription: x"), Err(ParseError::NoMatch));
    }

    #[test]
    fn rejects_replies_without_the_pair() {
        assert_eq!(parse_reply(""), Err(ParseError::NoMatch));
        assert_eq!(parse_reply("score: 10"), Err(ParseError::NoMatch));
        assert_eq!(parse_reply("the code is great"), Err(ParseError::NoMatch));
        // description on the same line is not the expected shape
        assert_eq!(
            parse_reply("score: 10 description: same line"),
            Err(ParseError::NoMatch)
        );
    }

    #[test]
    fn keeps_multi_line_descriptions() {
        let reply =
            parse_reply("score: 40\ndescription: first point\nsecond point").unwrap();
        assert_eq!(reply.description, "first point\nsecond point");
    }

    #[test]
    fn strips_trailing_fence_and_trims() {
        let reply = parse_reply("score: 12\ndescription: needs work\n````").unwrap();
        assert_eq!(reply.description, "needs work");

        // fence in the middle is untouched
        let reply = parse_reply("score: 12\ndescription: a ```` b").unwrap();
        assert_eq!(reply.description, "a ```` b");
    }

    #[test]
    fn tolerates_leading_output() {
        let reply = parse_reply("\nscore: 3\ndescription: terse").unwrap();
        assert_eq!(reply.score, 3.0);
    }
}
