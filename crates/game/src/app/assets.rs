use canvas_lord::{AssetError, AssetManager};

pub(crate) const MR_CLEAN_PNG: &str = "mr_clean.png";
pub(crate) const BADGUY_PNG: &str = "badguy.png";
pub(crate) const GRIMEBOSS_PNG: &str = "grimeboss.png";
pub(crate) const BUBBLES2_PNG: &str = "bubbles2.png";
pub(crate) const BG_PNG: &str = "bg.png";
pub(crate) const BG2_PNG: &str = "bg2.png";
pub(crate) const FLOOR_PNG: &str = "floor.png";
pub(crate) const LOGO_PNG: &str = "logo.png";

pub(crate) const THUD_WAV: &str = "thud.wav";
pub(crate) const THUNK_WAV: &str = "thunk.wav";
pub(crate) const WHACK_WAV: &str = "whack.wav";
pub(crate) const CRUNCH_WAV: &str = "crunch.wav";
pub(crate) const ACH_WAV: &str = "ach.wav";
pub(crate) const OW_WAV: &str = "ow.wav";
pub(crate) const UGH_WAV: &str = "ugh.wav";
pub(crate) const WUGH_WAV: &str = "wugh.wav";
pub(crate) const POP_WAV: &str = "pop.wav";

pub(crate) const IMAGES: [&str; 8] = [
    MR_CLEAN_PNG,
    BADGUY_PNG,
    GRIMEBOSS_PNG,
    BUBBLES2_PNG,
    BG_PNG,
    BG2_PNG,
    FLOOR_PNG,
    LOGO_PNG,
];

pub(crate) const SOUNDS: [&str; 9] = [
    THUD_WAV, THUNK_WAV, WHACK_WAV, CRUNCH_WAV, ACH_WAV, OW_WAV, UGH_WAV, WUGH_WAV, POP_WAV,
];

/// Played when a punch lands.
pub(crate) const PUNCH_SFX: [&str; 4] = [THUD_WAV, THUNK_WAV, WHACK_WAV, CRUNCH_WAV];
/// Played by the player when hurt.
pub(crate) const HURT_SFX: [&str; 4] = [ACH_WAV, OW_WAV, UGH_WAV, WUGH_WAV];

pub(crate) fn register_game_assets(manager: &mut AssetManager) -> Result<(), AssetError> {
    for key in IMAGES {
        manager.add_image(key)?;
    }
    for key in SOUNDS {
        manager.add_audio(key)?;
    }
    Ok(())
}
