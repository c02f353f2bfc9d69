//! MeCab subprocess tagger.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::error::TaggerError;

use super::{FeatureLayout, TaggedWord, Tagger};

/// Tagger backed by the `mecab` command line tool.
pub struct MecabTagger {
    command: String,
    layout: FeatureLayout,
}

impl MecabTagger {
    pub fn new(command: impl Into<String>, layout: FeatureLayout) -> Self {
        Self {
            command: command.into(),
            layout,
        }
    }

    fn run(&self, text: &str) -> Result<String, TaggerError> {
        let mut child = Command::new(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TaggerError::Unavailable(format!("{}: {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TaggerError::Failed("stdin not captured".to_string()))?;

        // Feed input while stdout drains so neither pipe can fill up
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                stdin.write_all(text.as_bytes())?;
                stdin.write_all(b"\n")
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(|e| TaggerError::Failed(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TaggerError::Failed(stderr.trim().to_string()));
        }
        written
            .map_err(|_| TaggerError::Failed("input writer panicked".to_string()))?
            .map_err(|e| TaggerError::Failed(format!("failed to write input: {}", e)))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Tagger for MecabTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedWord>, TaggerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let output = self.run(text)?;
        let words = parse_mecab_output(&output, self.layout);
        debug!("MeCab tagged {} words", words.len());
        Ok(words)
    }
}

/// Parse MeCab's default `surface\tfeature,feature,...` output.
pub fn parse_mecab_output(output: &str, layout: FeatureLayout) -> Vec<TaggedWord> {
    output
        .lines()
        .filter(|line| !line.is_empty() && *line != "EOS")
        .filter_map(|line| {
            let (surface, features) = line.split_once('\t')?;
            if surface.is_empty() {
                return None;
            }
            let features: Vec<&str> = features.split(',').collect();
            Some(TaggedWord::from_features(surface, &features, layout))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::PartOfSpeech;
    use pretty_assertions::assert_eq;

    const IPADIC_OUTPUT: &str = "\
役立た\t動詞,自立,*,*,五段・タ行,未然形,役立つ,ヤクダタ,ヤクダタ
ず\t助動詞,*,*,*,特殊・ヌ,連用ニ接続,ぬ,ズ,ズ
EOS
";

    const UNIDIC_OUTPUT: &str = "\
焼い\t動詞,一般,*,*,五段-カ行,連用形-イ音便,ヤク,焼く,焼い,ヤイ,焼く,ヤク,和,*,*,*,*
た\t助動詞,*,*,*,助動詞-タ,終止形-一般,タ,た,た,タ,た,タ,和,*,*,*,*
EOS
";

    #[test]
    fn test_parse_ipadic() {
        let words = parse_mecab_output(IPADIC_OUTPUT, FeatureLayout::Ipadic);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].surface, "役立た");
        assert_eq!(words[0].pos, PartOfSpeech::Verb);
        assert_eq!(words[0].conjugation_form.as_deref(), Some("未然形"));
        assert_eq!(words[0].lemma.as_deref(), Some("役立つ"));
        assert_eq!(words[1].pos, PartOfSpeech::Auxiliary);
        assert!(words[1].is_continuative());
    }

    #[test]
    fn test_parse_unidic_uses_written_base_form() {
        let words = parse_mecab_output(UNIDIC_OUTPUT, FeatureLayout::Unidic);
        assert_eq!(words[0].lemma.as_deref(), Some("焼く"));
        assert!(words[0].is_continuative());
        assert_eq!(words[1].conjugation_type.as_deref(), Some("助動詞-タ"));
    }

    #[test]
    fn test_parse_short_unknown_word_features() {
        let output = "ヨミトリ\t名詞,固有名詞,一般,*,*,*\nEOS\n";
        let words = parse_mecab_output(output, FeatureLayout::Ipadic);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].pos, PartOfSpeech::Noun);
        assert_eq!(words[0].lemma, None);
        assert_eq!(words[0].conjugation_form, None);
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let tagger = MecabTagger::new("yomitori-no-such-mecab", FeatureLayout::Ipadic);
        let err = tagger.tag("猫").unwrap_err();
        assert!(matches!(err, TaggerError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_input_does_not_block() {
        // `cat` echoes its input, which is already in MeCab's output format
        let line = "勇者\t名詞,一般,*,*,*,*,勇者,ユウシャ,ユーシャ\n";
        let input = line.repeat(20_000);
        let tagger = MecabTagger::new("cat", FeatureLayout::Ipadic);

        let words = tagger.tag(&input).unwrap();
        assert_eq!(words.len(), 20_000);
        assert_eq!(words[19_999].surface, "勇者");
    }

    #[test]
    fn test_empty_text_skips_subprocess() {
        let tagger = MecabTagger::new("yomitori-no-such-mecab", FeatureLayout::Ipadic);
        assert!(tagger.tag("  ").unwrap().is_empty());
    }
}
