//! The opening scene: Eldric and Cassius, interrupted by Malrik.

use super::{DialogueLine, LineMarker, Script};

const INTRODUCTION: [(&str, &str, LineMarker); 17] = [
    ("Cassius", "Dad, when I grow up, I want to swing a sword like you!", LineMarker::None),
    (
        "Eldric",
        "Hah! A sword's only as good as the heart that wields it. You've got time to learn, little one.",
        LineMarker::None,
    ),
    ("Cassius", "But you always say strength comes from the heart, not muscles.", LineMarker::None),
    (
        "Eldric",
        "That's right. Remember, courage isn't about fighting -- it's about protecting what you love.",
        LineMarker::None,
    ),
    (
        "",
        "(Sudden rumble; the sky darkens, thunder cracks. Purple energy swirls in the distance.)",
        LineMarker::Rumble,
    ),
    ("Eldric", "Cassius... stay behind me.", LineMarker::None),
    (
        "",
        "(A dark portal tears open. Malrik steps through, surrounded by black flame.)",
        LineMarker::PortalOpen,
    ),
    (
        "Malrik (mocking tone)",
        "Touching words for a farmer playing hero. Tell me, Eldric... how strong is your courage when it's ripped away?",
        LineMarker::None,
    ),
    ("Eldric", "Malrik...! You have no place here!", LineMarker::None),
    ("Malrik", "Oh, but I do. I've come for what gives you strength.", LineMarker::None),
    (
        "",
        "(Malrik raises his staff. A burst of energy traps Cassius in a shadow orb.)",
        LineMarker::TrapCast,
    ),
    ("Cassius", "Dad! Help!", LineMarker::None),
    ("Eldric", "CASSIUS!!!", LineMarker::None),
    (
        "Malrik (grinning)",
        "You'll never reach me in your current state. Come find me -- if you survive.",
        LineMarker::None,
    ),
    (
        "",
        "(Malrik disappears with Cassius through a collapsing portal. Silence follows. Rain begins to fall.)",
        LineMarker::PortalClose,
    ),
    ("Eldric", "No... Cassius... what have I done?", LineMarker::None),
    (
        "",
        "(Screen fades to black -- soft music begins, symbolizing loss and resolve.)",
        LineMarker::FadeOut,
    ),
];

impl Script {
    /// The built-in introduction script.
    pub fn introduction() -> Self {
        Script::from_static(
            INTRODUCTION
                .iter()
                .map(|(speaker, text, marker)| {
                    DialogueLine::new(*speaker, *text).with_marker(*marker)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introduction_shape() {
        let script = Script::introduction();
        assert_eq!(script.len(), 17);
        assert_eq!(script.position_of(LineMarker::Rumble), Some(4));
        assert_eq!(script.position_of(LineMarker::PortalOpen), Some(6));
        assert_eq!(script.position_of(LineMarker::TrapCast), Some(10));
        assert_eq!(script.position_of(LineMarker::PortalClose), Some(14));
        assert_eq!(script.position_of(LineMarker::FadeOut), Some(16));
        assert!(script.is_last(16));
    }

    #[test]
    fn test_introduction_narration_has_no_speaker() {
        let script = Script::introduction();
        let narration: Vec<_> = script.lines().iter().filter(|l| l.is_narration()).collect();
        assert_eq!(narration.len(), 5);
        assert!(narration.iter().all(|l| l.marker != LineMarker::None));
    }
}
