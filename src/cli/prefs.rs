use comfy_table::{Cell, Table};

use super::PrefsCommands;
use crate::error::Result;
use crate::settings::{Settings, SettingsStore};

pub fn dispatch(cmd: PrefsCommands, store: &mut dyn SettingsStore) -> Result<()> {
    match cmd {
        PrefsCommands::Show => {
            let settings = store.load();
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);
            for key in Settings::KEYS {
                table.add_row(vec![Cell::new(key), Cell::new(settings.get(key)?)]);
            }
            println!("Preferences\n{table}");
        }
        PrefsCommands::Get { key } => println!("{}", store.load().get(&key)?),
        PrefsCommands::Set { key, value } => {
            let mut settings = store.load();
            settings.set(&key, &value)?;
            store.save(&settings)?;
            println!("{key} = {}", settings.get(&key)?);
        }
        PrefsCommands::ToggleTheme => {
            let theme = store.toggle_theme()?;
            println!("Theme: {}", theme.as_str());
        }
    }
    Ok(())
}
