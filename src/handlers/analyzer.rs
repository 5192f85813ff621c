use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{AnalysisOutcome, ImagePayload, MacroReport};
use crate::prompts;
use crate::services::VisionModel;

/// True iff the model answered exactly `"yes"`. `"Yes"`, `"yes."` and friends
/// all count as not-food; the classification prompt asks for the literal word.
pub fn interpret_classification(reply: &str) -> bool {
    reply == "yes"
}

/// Normalized variant: trims and lowercases before matching, and refuses to
/// guess when the reply falls outside {"yes", "no"}. Opt-in via
/// `LENIENT_CLASSIFY`; note it changes what malformed replies do.
pub fn interpret_classification_lenient(reply: &str) -> Result<bool, AnalysisError> {
    match reply.trim().to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(AnalysisError::UnexpectedReply(format!(
            "expected 'yes' or 'no', got: {reply:?}"
        ))),
    }
}

pub struct FoodAnalyzer {
    model: Arc<dyn VisionModel>,
    lenient_classify: bool,
}

impl FoodAnalyzer {
    pub fn new(model: Arc<dyn VisionModel>, lenient_classify: bool) -> Self {
        Self {
            model,
            lenient_classify,
        }
    }

    /// One full run: classify the image, then fetch the macro estimate only
    /// when it is food. At most one request is in flight at a time.
    pub async fn analyze(&self, image_path: &str) -> Result<AnalysisOutcome, AnalysisError> {
        log::info!("📸 Analyzing image: {}", image_path);

        let image = ImagePayload::from_path(image_path)?;
        let reply = self
            .model
            .generate(prompts::food_classification_prompt(), Some(&image))
            .await?;
        log::debug!("💬 Classification reply: {:?}", reply);

        let is_food = if self.lenient_classify {
            interpret_classification_lenient(&reply)?
        } else {
            interpret_classification(&reply)
        };

        if !is_food {
            log::info!("🚫 Image not classified as food");
            return Ok(AnalysisOutcome::NotFood);
        }

        // The macro call re-reads and re-encodes the file; nothing is cached
        // between the two requests of a run.
        let image = ImagePayload::from_path(image_path)?;
        let report = self
            .model
            .generate(prompts::macro_prompt(), Some(&image))
            .await?;
        log::info!("✅ Macro estimate received ({} bytes)", report.len());

        Ok(AnalysisOutcome::Macros(MacroReport::new(report)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl VisionModel for ScriptedModel {
        async fn generate(
            &self,
            instruction: &str,
            image: Option<&ImagePayload>,
        ) -> Result<String, AnalysisError> {
            assert!(image.is_some(), "analyzer calls always carry the image");
            self.calls.lock().unwrap().push(instruction.to_string());
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted model call"))
        }
    }

    fn temp_image(tag: &str) -> String {
        let path = std::env::temp_dir().join(format!("macrosnap-{tag}.jpg"));
        std::fs::write(&path, b"not really a jpeg").unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn strict_interpretation_is_exact_match() {
        assert!(interpret_classification("yes"));
        assert!(!interpret_classification("Yes"));
        assert!(!interpret_classification("yes."));
        assert!(!interpret_classification("no"));
        assert!(!interpret_classification(""));
    }

    #[test]
    fn lenient_interpretation_normalizes_and_rejects() {
        assert!(interpret_classification_lenient(" Yes ").unwrap());
        assert!(interpret_classification_lenient("YES").unwrap());
        assert!(!interpret_classification_lenient("No").unwrap());
        assert!(matches!(
            interpret_classification_lenient("maybe"),
            Err(AnalysisError::UnexpectedReply(_))
        ));
        assert!(matches!(
            interpret_classification_lenient(""),
            Err(AnalysisError::UnexpectedReply(_))
        ));
    }

    #[tokio::test]
    async fn food_image_triggers_macro_call_and_verbatim_report() {
        let macros = "Proteins: 20g\nCarbs: 30g\nFat: 10g\nCalories: 320";
        let model = ScriptedModel::new(&["yes", macros]);
        let analyzer = FoodAnalyzer::new(model.clone(), false);

        let outcome = analyzer.analyze(&temp_image("food")).await.unwrap();

        assert_eq!(
            outcome,
            AnalysisOutcome::Macros(MacroReport::new(macros.to_string()))
        );
        assert_eq!(
            model.calls(),
            vec![
                prompts::food_classification_prompt().to_string(),
                prompts::macro_prompt().to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn non_food_image_makes_no_second_call() {
        let model = ScriptedModel::new(&["no"]);
        let analyzer = FoodAnalyzer::new(model.clone(), false);

        let outcome = analyzer.analyze(&temp_image("not-food")).await.unwrap();

        assert_eq!(outcome, AnalysisOutcome::NotFood);
        assert_eq!(
            model.calls(),
            vec![prompts::food_classification_prompt().to_string()]
        );
    }

    #[tokio::test]
    async fn capitalized_yes_is_not_food_in_strict_mode() {
        let model = ScriptedModel::new(&["Yes"]);
        let analyzer = FoodAnalyzer::new(model.clone(), false);

        let outcome = analyzer.analyze(&temp_image("caps")).await.unwrap();

        assert_eq!(outcome, AnalysisOutcome::NotFood);
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn lenient_mode_surfaces_malformed_replies() {
        let model = ScriptedModel::new(&["It sure looks tasty!"]);
        let analyzer = FoodAnalyzer::new(model.clone(), true);

        let err = analyzer.analyze(&temp_image("malformed")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::UnexpectedReply(_)));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_image_fails_before_any_call() {
        let model = ScriptedModel::new(&[]);
        let analyzer = FoodAnalyzer::new(model.clone(), false);

        let err = analyzer
            .analyze("/definitely/not/here.jpg")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Decode { .. }));
        assert!(model.calls().is_empty());
    }
}
