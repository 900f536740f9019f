/// The prompt template used for generating a recipe from a dish name.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
///
/// Contains `{{DISH}}` and `{{IMAGE}}` placeholders that are replaced
/// by `build_recipe_prompt`.
pub const RECIPE_GENERATION_PROMPT: &str = include_str!("prompt.txt");

/// Build the image URL for a dish from a template containing `{dish}`.
/// The dish name is percent-encoded.
pub fn image_url_for(template: &str, dish_name: &str) -> String {
    template.replace("{dish}", &urlencoding::encode(dish_name.trim()))
}

/// Injects the dish name and image URL into the prompt template.
///
/// The dish name is inserted as typed; whatever the model answers, the
/// provenance fields of the record are overwritten after parsing.
pub fn build_recipe_prompt(dish_name: &str, image_url: &str) -> String {
    RECIPE_GENERATION_PROMPT
        .replace("{{DISH}}", dish_name.trim())
        .replace("{{IMAGE}}", image_url)
}
