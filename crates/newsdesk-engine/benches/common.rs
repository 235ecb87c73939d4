// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use newsdesk_engine::editing::BlockListEditor;
use newsdesk_engine::models::{BlockType, HeadingSize};

#[allow(dead_code)]
pub fn generate_document(sections: usize) -> BlockListEditor {
    let mut editor = BlockListEditor::new();

    for section in 0..sections {
        let heading = editor.append(BlockType::Heading);
        editor.update_content(&heading, format!("Section {section}"));
        editor.set_heading_size(&heading, HeadingSize::H2);

        let paragraph = editor.append(BlockType::Paragraph);
        editor.update_content(
            &paragraph,
            "Some paragraph content with multiple sentences. Enough to look like a real article.",
        );

        let list = editor.append(BlockType::List);
        editor.set_list_items(
            &list,
            (0..5).map(|i| format!("Point {i} of section {section}")).collect(),
        );

        let image = editor.append(BlockType::Image);
        editor.update_content(&image, format!("https://cdn.example/{section}.jpg"));
        editor.set_image_caption(&image, Some(format!("Photo {section}")));
    }

    editor
}
