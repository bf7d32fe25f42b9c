//! Tone modes for the chat-based features

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persona used by the personality chat and its profile card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Forum veteran: blunt, meme-heavy, occasionally savage
    #[default]
    Tieba,
    /// Passive-aggressive, sweet on the surface
    Tea,
    /// Sharp-tongued, no mercy
    Savage,
    /// Soft, clingy, emoji-heavy
    Cute,
}

impl ChatMode {
    /// Persona line placed at the top of every system prompt for this mode
    pub fn persona(&self) -> &'static str {
        match self {
            ChatMode::Tieba => {
                "你是一个百度贴吧资深老哥，说话风格：直接、幽默、带点网络梗、偶尔毒舌但有趣。"
            }
            ChatMode::Tea => "你是一个茶里茶气的AI，说话风格：阴阳怪气、暗戳戳、表面温柔实际带刺。",
            ChatMode::Savage => "你是一个毒舌AI，说话风格：犀利、一针见血、不留情面但有趣。",
            ChatMode::Cute => "你是一个可爱AI，说话风格：软萌、撒娇、用emoji、温柔治愈。",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Tieba => "tieba",
            ChatMode::Tea => "tea",
            ChatMode::Savage => "savage",
            ChatMode::Cute => "cute",
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tieba" => Ok(ChatMode::Tieba),
            "tea" => Ok(ChatMode::Tea),
            "savage" => Ok(ChatMode::Savage),
            "cute" => Ok(ChatMode::Cute),
            _ => Err(format!("Unknown chat mode: {}", s)),
        }
    }
}

/// Tone of the mood diagnosis. Only the system prompt and temperature differ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisMode {
    /// Supportive and warm
    #[default]
    Gentle,
    /// Blunt and confrontational
    Savage,
}

impl DiagnosisMode {
    pub fn temperature(&self) -> f32 {
        match self {
            DiagnosisMode::Gentle => 0.8,
            DiagnosisMode::Savage => 0.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisMode::Gentle => "gentle",
            DiagnosisMode::Savage => "savage",
        }
    }
}

impl std::fmt::Display for DiagnosisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiagnosisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gentle" => Ok(DiagnosisMode::Gentle),
            "savage" => Ok(DiagnosisMode::Savage),
            _ => Err(format!("Unknown diagnosis mode: {}", s)),
        }
    }
}
