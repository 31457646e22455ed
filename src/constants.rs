pub const API_KEY_ENV_NAME: &str = "MERCHGEN_API_KEY";

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant who is very good at interpreting text from raw HTML.";

pub(crate) const PROMPT_TEMPLATE: &str = r#"I'm working with non-profit. I'm trying to build a merchandise store for them. Below is raw text from their website.

{raw_text}

Write a description of a good merch store to raise funds for this non-profit.

The descriptions should include a general design for the shop. Your description should also include a detailed description of at least 5 different products to be sold. The products that could be created are T-shirt, Hoodie, Backpack, Mug, Beanie, Phone case, Leggings, Jackets, Shoes, Stickers, Tote Bags, Posters, Water Bottles, Greeting Cards and Airpod cases
The products should be in the following format:

Name: [Product name (one of the above)]
Description: [detailed summary of the product, which entices the user to buy it.]
Price: [in cents, e.g. 10000 for $10.00]
Alt-text for design: [description of a pattern for the product design. **Include the style at the end.**, e.g. "a black and white pattern of a cartoon penguin, digital art style". Don't include text that should be written on the product in the alt-text.]

Note: The artist creating the designs is a non-english speaker, so the alt-text should not contain references to quotes or text.

Before giving your description, write your reasoning for what would make the most money for the non-profit. After your description, write the main content section of the website.

The main content section should have the following format:

Header: [Tagline for the website]
Description: [Description of the merchandise store, which entices the user to buy the products.]
Primary color: [CSS color code, e.g. #000000]
Secondary color: [CSS color code, e.g. #000000]
Accent color: [CSS color code, e.g. #000000]

Your answer should be structured as follows:

Reasoning: [Your reasoning for what would the most money for the non-profit, giving a step by step explanation of your thought process and why you think it will maximize revenue]

Description of the website: [Your description of a good merch store to raise funds for this non-profit]

Main content section: [Your description of the main content section of the website in the format above]

Products: [Your description of at least 8 different products to be sold]"#;
