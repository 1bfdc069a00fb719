pub const PREVIEW_ROWS: usize = 8;

pub const HELP_TEXT: &str = "Formatos aceites:\n\
    • CSV: a primeira linha tem os nomes das colunas (separador , ou ;)\n\
    • JSON: uma lista de objetos, ou {\"grupo\": \"...\", \"registos\": [...]}\n\
    • TXT: um registo por linha\n\n\
    Escolha um ficheiro e carregue em Importar. \"Grupo Riba\" repõe os dados de exemplo.";

/// View-only toggles that never reach the controller.
#[derive(Debug, Default)]
pub struct PanelState {
    pub show_preview: bool,
}

impl PanelState {
    pub fn preview_toggle_label(&self) -> &'static str {
        if self.show_preview {
            "Esconder dados"
        } else {
            "Ver dados"
        }
    }
}

pub fn import_button_label(importing: bool) -> &'static str {
    if importing {
        "Importando..."
    } else {
        "Importar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_state() {
        assert_eq!(import_button_label(true), "Importando...");
        assert_eq!(import_button_label(false), "Importar");

        let mut state = PanelState::default();
        assert_eq!(state.preview_toggle_label(), "Ver dados");
        state.show_preview = true;
        assert_eq!(state.preview_toggle_label(), "Esconder dados");
    }
}
