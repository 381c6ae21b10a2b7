use anyhow::Context;

use super::{CommandMode, EnterParams, InsertMode, Mode, ModeName, NormalMode, Transition};
use crate::editor::Editor;
use crate::input::{Key, KeySource};
use crate::view::Renderer;

/// Owns the editor and the three modes, and runs the draw/read/update loop
pub struct ModeMachine {
    editor: Editor,
    normal: NormalMode,
    insert: InsertMode,
    command: CommandMode,
    current: Option<ModeName>,
}

impl ModeMachine {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            normal: NormalMode::new(),
            insert: InsertMode::new(),
            command: CommandMode::new(),
            current: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn into_editor(self) -> Editor {
        self.editor
    }

    /// The active mode (`None` before the first switch)
    pub fn current(&self) -> Option<ModeName> {
        self.current
    }

    /// Leave the active mode (if any), then enter `mode` with `params`
    pub fn switch_mode(&mut self, mode: ModeName, params: EnterParams) {
        let Self {
            editor,
            normal,
            insert,
            command,
            current,
        } = self;

        if let Some(old) = current.take() {
            tracing::debug!("Leave {}", old);
            select(old, normal, insert, command).leave(editor);
        }
        tracing::debug!("Enter {}", mode);
        select(mode, normal, insert, command).enter(editor, params);
        *current = Some(mode);
    }

    /// Feed one keystroke to the active mode and apply the transition it asks for.
    ///
    /// Enters Normal mode first if no mode is active yet.
    pub fn handle_key(&mut self, key: Option<Key>) -> anyhow::Result<Transition> {
        let mode = self.ensure_mode();
        if key.is_some() {
            self.editor.clear_status();
        }

        let Self {
            editor,
            normal,
            insert,
            command,
            ..
        } = self;
        let transition = select(mode, normal, insert, command)
            .update(editor, key)
            .with_context(|| format!("{} failed to handle {:?}", mode, key))?;

        if let Transition::Switch(next, params) = &transition {
            self.switch_mode(*next, params.clone());
        }
        Ok(transition)
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        let mode = self.ensure_mode();
        let Self {
            editor,
            normal,
            insert,
            command,
            ..
        } = self;
        select(mode, normal, insert, command).draw(editor, renderer)
    }

    /// Run until a mode asks to quit
    pub fn run(
        &mut self,
        keys: &mut dyn KeySource,
        renderer: &mut dyn Renderer,
    ) -> anyhow::Result<()> {
        tracing::info!("Starting main loop");
        loop {
            self.draw(renderer)?;
            let key = keys.read()?;
            if self.handle_key(key)? == Transition::Quit {
                break;
            }
        }
        tracing::info!("Quit from {:?}", self.current);
        Ok(())
    }

    fn ensure_mode(&mut self) -> ModeName {
        match self.current {
            Some(mode) => mode,
            None => {
                self.switch_mode(ModeName::Normal, EnterParams::default());
                ModeName::Normal
            }
        }
    }
}

fn select<'a>(
    mode: ModeName,
    normal: &'a mut NormalMode,
    insert: &'a mut InsertMode,
    command: &'a mut CommandMode,
) -> &'a mut dyn Mode {
    match mode {
        ModeName::Normal => normal,
        ModeName::Insert => insert,
        ModeName::Command => command,
    }
}
