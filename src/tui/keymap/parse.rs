use super::{Action, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};
use crossterm::event::{KeyCode, KeyModifiers};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

const MAX_KEYMAP_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_BINDINGS_PER_MODE: usize = 256;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapsFile {
    meta: Option<KeymapsMeta>,
    keymaps: Option<HashMap<String, KeymapFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapsMeta {
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapFile {
    description: Option<String>,
    normal: Option<HashMap<String, String>>,
    edit: Option<HashMap<String, String>>,
    command: Option<HashMap<String, String>>,
}

/// Load the keymap, preferring an explicit `--keymap-file` over the user
/// config directory. Any problem degrades to the built-in map, with the
/// reasons collected as warnings.
pub fn load_keymap(keymap_file: Option<&PathBuf>) -> (Keymap, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = keymap_file.cloned().or_else(user_keymaps_path);
    let mut file: Option<KeymapsFile> = None;

    if let Some(path) = config_path.as_ref() {
        if path.exists() {
            match std::fs::metadata(path) {
                Ok(meta) if meta.len() > MAX_KEYMAP_FILE_BYTES => {
                    warnings.push(format!(
                        "Refusing to read {}: file too large ({} bytes, max {})",
                        path.display(),
                        meta.len(),
                        MAX_KEYMAP_FILE_BYTES
                    ));
                }
                Ok(_) => match std::fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<KeymapsFile>(&content) {
                        Ok(parsed) => file = Some(parsed),
                        Err(err) => {
                            warnings.push(format!("Failed to parse {}: {}", path.display(), err))
                        }
                    },
                    Err(err) => {
                        warnings.push(format!("Failed to read {}: {}", path.display(), err))
                    }
                },
                Err(err) => warnings.push(format!(
                    "Failed to read metadata for {}: {}",
                    path.display(),
                    err
                )),
            }
        } else if keymap_file.is_some() {
            warnings.push(format!("Keymap file not found: {}", path.display()));
        }
    }

    let target = file
        .as_ref()
        .and_then(|f| f.meta.as_ref())
        .and_then(|m| m.default.as_deref())
        .unwrap_or("default");

    if let Some(file) = file.as_ref()
        && let Some(keymaps) = file.keymaps.as_ref()
    {
        if let Some(entry) = keymaps.get(target) {
            match build_custom_keymap(target, entry) {
                Ok(custom) => return (Keymap::Custom(custom), warnings),
                Err(errs) => warnings.extend(errs),
            }
        } else if !target.eq_ignore_ascii_case("default") {
            warnings.push(format!(
                "Keymap '{}' not found; falling back to built-in bindings",
                target
            ));
        }
    }

    (Keymap::Default, warnings)
}

fn user_keymaps_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("keymaps.toml");
    Some(path)
}

fn build_custom_keymap(name: &str, entry: &KeymapFile) -> Result<CustomKeymap, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let normal = parse_mode_bindings("normal", entry.normal.as_ref(), &mut errors);
    let edit = parse_mode_bindings("edit", entry.edit.as_ref(), &mut errors);
    let command = parse_mode_bindings("command", entry.command.as_ref(), &mut errors);

    if errors.is_empty() {
        Ok(CustomKeymap {
            name: name.to_string(),
            description: entry.description.clone(),
            bindings: KeymapBindings {
                normal,
                edit,
                command,
            },
        })
    } else {
        Err(errors)
    }
}

fn parse_mode_bindings(
    mode: &str,
    raw: Option<&HashMap<String, String>>,
    errors: &mut Vec<String>,
) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = Vec::new();
    let Some(raw) = raw else {
        return bindings;
    };
    if raw.len() > MAX_BINDINGS_PER_MODE {
        errors.push(format!(
            "Too many {} bindings: {} (max {})",
            mode,
            raw.len(),
            MAX_BINDINGS_PER_MODE
        ));
        return bindings;
    }
    for (combo_str, action_str) in raw {
        match (parse_key_combo(combo_str), action_from_str(action_str)) {
            (Ok(combo), Some(action)) => {
                if bindings.iter().any(|binding| binding.combo == combo) {
                    errors.push(format!(
                        "Duplicate key '{}' in {} bindings",
                        combo.display(),
                        mode
                    ));
                    continue;
                }
                bindings.push(Binding { combo, action });
            }
            (Ok(_), None) => errors.push(format!(
                "Invalid action '{}' in {} bindings",
                action_str, mode
            )),
            (Err(err), _) => errors.push(format!(
                "Invalid key '{}' in {} bindings: {}",
                combo_str, mode, err
            )),
        }
    }
    bindings
}

fn parse_key_combo(input: &str) -> Result<KeyCombo, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyCombo {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::empty(),
        });
    }

    let (mods, key_part) = if !trimmed.contains('-') {
        (KeyModifiers::empty(), trimmed)
    } else if let Some(mod_str) = trimmed.strip_suffix('-') {
        let mod_str = mod_str.trim_end_matches('-');
        if mod_str.is_empty() {
            return Err("missing modifier before '-'".to_string());
        }
        let modifiers = parse_modifiers(mod_str)?;
        (modifiers, "-")
    } else {
        let mut split = trimmed.rsplitn(2, '-');
        let key_part = split.next().ok_or_else(|| "empty key".to_string())?;
        let mod_str = split.next().unwrap_or_default();
        let modifiers = parse_modifiers(mod_str)?;
        (modifiers, key_part)
    };

    let key = parse_key_code(key_part)?;
    Ok(KeyCombo {
        code: key,
        modifiers: mods,
    })
}

fn parse_modifiers(input: &str) -> Result<KeyModifiers, String> {
    let mut modifiers = KeyModifiers::empty();
    for part in input.split('-') {
        let raw = part.trim();
        if raw.is_empty() {
            return Err("empty modifier segment".to_string());
        }
        let flag = match raw.to_ascii_lowercase().as_str() {
            "c" | "ctrl" | "control" => KeyModifiers::CONTROL,
            "m" | "alt" | "meta" => KeyModifiers::ALT,
            "s" | "shift" => KeyModifiers::SHIFT,
            _ => return Err(format!("unknown modifier '{}'", part)),
        };
        if modifiers.contains(flag) {
            return Err(format!("duplicate modifier '{}'", raw));
        }
        modifiers.insert(flag);
    }
    Ok(modifiers)
}

fn parse_key_code(input: &str) -> Result<KeyCode, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyCode::Char(ch));
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "enter" => Ok(KeyCode::Enter),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "backspace" => Ok(KeyCode::Backspace),
        "delete" => Ok(KeyCode::Delete),
        "tab" => Ok(KeyCode::Tab),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" => Ok(KeyCode::PageUp),
        "pagedown" => Ok(KeyCode::PageDown),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "space" | "spc" => Ok(KeyCode::Char(' ')),
        "dash" | "minus" => Ok(KeyCode::Char('-')),
        "colon" => Ok(KeyCode::Char(':')),
        "question" => Ok(KeyCode::Char('?')),
        _ => Err(format!("unknown key '{}'", input)),
    }
}

fn parse_single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    let ch = chars.next()?;
    if chars.next().is_none() { Some(ch) } else { None }
}

fn action_from_str(input: &str) -> Option<Action> {
    match input.trim().to_ascii_lowercase().as_str() {
        "cancel" => Some(Action::Cancel),
        "enter_edit" => Some(Action::EnterEdit),
        "commit_edit" => Some(Action::CommitEdit),
        "enter_command" => Some(Action::EnterCommand),
        "execute_command" => Some(Action::ExecuteCommand),
        "toggle_view" => Some(Action::ToggleView),
        "move_left" => Some(Action::Move(-1, 0)),
        "move_right" => Some(Action::Move(1, 0)),
        "move_up" => Some(Action::Move(0, -1)),
        "move_down" => Some(Action::Move(0, 1)),
        "copy_left" => Some(Action::Copy(-1, 0)),
        "copy_right" => Some(Action::Copy(1, 0)),
        "copy_up" => Some(Action::Copy(0, -1)),
        "copy_down" => Some(Action::Copy(0, 1)),
        "page_up" => Some(Action::Page(-1)),
        "page_down" => Some(Action::Page(1)),
        "goto_first" => Some(Action::GotoFirst),
        "goto_last" => Some(Action::GotoLast),
        "save" => Some(Action::Save),
        "help" => Some(Action::Help),
        "quit" => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_combo_ctrl() {
        let combo = parse_key_combo("C-s").expect("combo");
        assert_eq!(combo.code, KeyCode::Char('s'));
        assert!(combo.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn parse_key_combo_named_key() {
        let combo = parse_key_combo("Enter").expect("combo");
        assert_eq!(combo.code, KeyCode::Enter);
        assert!(combo.modifiers.is_empty());
    }

    #[test]
    fn parse_key_combo_ctrl_arrow() {
        let combo = parse_key_combo("C-Left").expect("combo");
        assert_eq!(combo.code, KeyCode::Left);
        assert!(combo.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn parse_key_combo_rejects_duplicate_modifier() {
        let err = parse_key_combo("C-C-s").unwrap_err();
        assert!(err.contains("duplicate modifier"));
    }

    #[test]
    fn action_from_str_copy_down() {
        assert_eq!(action_from_str("copy_down"), Some(Action::Copy(0, 1)));
        assert_eq!(action_from_str("bogus"), None);
    }

    #[test]
    fn load_keymap_reads_custom_map() {
        let temp_path = std::env::temp_dir().join(format!(
            "gridcalc_keymaps_custom_{}.toml",
            std::process::id()
        ));
        let content = r#"
[meta]
default = "mine"

[keymaps.mine]
description = "test map"

[keymaps.mine.normal]
"e" = "enter_edit"
"C-s" = "save"
"#;
        std::fs::write(&temp_path, content).expect("write temp keymap");

        let (keymap, warnings) = load_keymap(Some(&temp_path));
        assert!(warnings.is_empty());
        match keymap {
            Keymap::Custom(custom) => {
                assert_eq!(custom.name, "mine");
                assert_eq!(custom.bindings.normal.len(), 2);
            }
            Keymap::Default => panic!("expected a custom keymap"),
        }

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn load_keymap_missing_file_warns_and_falls_back() {
        let temp_path = std::env::temp_dir().join("gridcalc_keymaps_does_not_exist.toml");
        let _ = std::fs::remove_file(&temp_path);
        let (keymap, warnings) = load_keymap(Some(&temp_path));
        assert_eq!(keymap, Keymap::Default);
        assert!(warnings.iter().any(|w| w.contains("not found")));
    }

    #[test]
    fn load_keymap_bad_binding_falls_back_with_warning() {
        let temp_path = std::env::temp_dir().join(format!(
            "gridcalc_keymaps_bad_{}.toml",
            std::process::id()
        ));
        let content = r#"
[meta]
default = "broken"

[keymaps.broken.normal]
"NotAKey" = "save"
"#;
        std::fs::write(&temp_path, content).expect("write temp keymap");

        let (keymap, warnings) = load_keymap(Some(&temp_path));
        assert_eq!(keymap, Keymap::Default);
        assert!(warnings.iter().any(|w| w.contains("Invalid key")));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn load_keymap_rejects_unknown_fields() {
        let temp_path = std::env::temp_dir().join(format!(
            "gridcalc_keymaps_unknown_{}.toml",
            std::process::id()
        ));
        let content = r#"
[meta]
default = "default"
extra = "not-allowed"
"#;
        std::fs::write(&temp_path, content).expect("write temp keymap");

        let (keymap, warnings) = load_keymap(Some(&temp_path));
        assert_eq!(keymap, Keymap::Default);
        assert!(warnings.iter().any(|w| w.contains("Failed to parse")));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn load_keymap_rejects_oversized_file() {
        let temp_path = std::env::temp_dir().join(format!(
            "gridcalc_keymaps_large_{}.toml",
            std::process::id()
        ));
        let oversized = "a".repeat(MAX_KEYMAP_FILE_BYTES as usize + 1);
        std::fs::write(&temp_path, oversized).expect("write oversized keymap");

        let (keymap, warnings) = load_keymap(Some(&temp_path));
        assert_eq!(keymap, Keymap::Default);
        assert!(warnings.iter().any(|w| w.contains("file too large")));

        let _ = std::fs::remove_file(&temp_path);
    }
}
