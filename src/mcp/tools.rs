//! MCP tool definitions and argument types.

use super::protocol::Tool;
use serde::Deserialize;
use serde_json::json;

pub const GENERATE_IMAGE: &str = "generateImage";
pub const GENERATE_VIDEO: &str = "generateVideo";

/// Arguments of `generateImage`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageArgs {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
}

/// Arguments of `generateVideo`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoArgs {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: GENERATE_IMAGE.to_string(),
            description: "Generate an image from a text prompt with Gemini. \
                The image is saved to the working directory and returned inline."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Description of the image to generate"
                    },
                    "aspectRatio": {
                        "type": "string",
                        "description": "Aspect ratio such as 1:1, 16:9 or 9:16",
                        "default": "1:1"
                    },
                    "outputFormat": {
                        "type": "string",
                        "description": "File extension for the saved image",
                        "default": "png"
                    }
                },
                "required": ["prompt"]
            }),
        },
        Tool {
            name: GENERATE_VIDEO.to_string(),
            description: "Generate a short video with Veo from a text prompt, optionally \
                starting from a local image. Waits for the job to finish (up to a few minutes), \
                saves the MP4 locally and returns a JSON status."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Description of the video to generate"
                    },
                    "aspectRatio": {
                        "type": "string",
                        "description": "Aspect ratio, 9:16 or 16:9",
                        "default": "9:16"
                    },
                    "model": {
                        "type": "string",
                        "description": "Veo model identifier",
                        "default": "veo-3.0-generate-001"
                    },
                    "imagePath": {
                        "type": "string",
                        "description": "Optional local image used as the first frame"
                    }
                },
                "required": ["prompt"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names() {
        let names: Vec<String> = get_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec![GENERATE_IMAGE, GENERATE_VIDEO]);
    }

    #[test]
    fn test_parse_video_args() {
        let args: GenerateVideoArgs = serde_json::from_value(json!({
            "prompt": "a cat",
            "imagePath": "/tmp/cat.png"
        }))
        .unwrap();
        assert_eq!(args.prompt, "a cat");
        assert!(args.aspect_ratio.is_none());
        assert_eq!(args.image_path.as_deref(), Some("/tmp/cat.png"));
    }

    #[test]
    fn test_parse_image_args_requires_prompt() {
        let result: std::result::Result<GenerateImageArgs, _> =
            serde_json::from_value(json!({ "aspectRatio": "16:9" }));
        assert!(result.is_err());
    }
}
