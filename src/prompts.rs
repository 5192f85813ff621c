//! Fixed instruction strings sent to the vision model. No templating, no
//! interpolation; the labeled output format is a convention requested of the
//! model, not something this crate validates.

pub fn macro_prompt() -> &'static str {
    "Give me only total macros (protein, carbs, fat) and caloric approximations in the format: \
     Proteins: <proteins>\n\
     Carbs: <carbs>\n\
     Fat: <fat>\n\
     Calories: <calories>"
}

pub fn food_classification_prompt() -> &'static str {
    "Respond 'yes' if the image represents food, 'no' otherwise."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_are_pure() {
        assert_eq!(macro_prompt(), macro_prompt());
        assert_eq!(food_classification_prompt(), food_classification_prompt());
    }

    #[test]
    fn macro_prompt_requests_labeled_lines() {
        let prompt = macro_prompt();
        assert!(prompt.contains("Proteins: <proteins>\nCarbs: <carbs>"));
        assert!(prompt.contains("Fat: <fat>\nCalories: <calories>"));
    }

    #[test]
    fn classification_prompt_requests_yes_no() {
        let prompt = food_classification_prompt();
        assert!(prompt.contains("'yes'"));
        assert!(prompt.contains("'no'"));
    }
}
