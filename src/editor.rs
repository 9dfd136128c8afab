//! 対話式プロセスマップ編集モジュール
//!
//! 読み込んだマップをセッションの編集状態に置き、
//! プロセス・関係の追加/更新/削除を行ってから確定して保存する。

use crate::error::Result;
use dialoguer::{Confirm, Input, Select};
use process_map_common::export::{map_from_json, map_to_json};
use process_map_common::{Interaction, ProcessCategory, ProcessDraft, ProcessMap, Session};
use std::path::Path;

/// 編集メニュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    AddProcess,
    UpdateProcess,
    DeleteProcess,
    AddInteraction,
    RemoveInteraction,
    Save,
    Quit,
}

impl EditAction {
    pub const ALL: [EditAction; 7] = [
        EditAction::AddProcess,
        EditAction::UpdateProcess,
        EditAction::DeleteProcess,
        EditAction::AddInteraction,
        EditAction::RemoveInteraction,
        EditAction::Save,
        EditAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditAction::AddProcess => "プロセスを追加",
            EditAction::UpdateProcess => "プロセスを更新",
            EditAction::DeleteProcess => "プロセスを削除",
            EditAction::AddInteraction => "関係を追加",
            EditAction::RemoveInteraction => "関係を削除",
            EditAction::Save => "保存して終了",
            EditAction::Quit => "保存せず終了",
        }
    }
}

/// カンマ/セミコロン区切りの入力を一覧にする
pub fn parse_list_input(text: &str) -> Vec<String> {
    text.split([',', ';'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// プロセス選択肢の表示文字列
pub fn process_choices(map: &ProcessMap) -> Vec<String> {
    map.processes
        .iter()
        .map(|p| format!("[{}] {}", p.category, p.name))
        .collect()
}

/// 関係選択肢の表示文字列
pub fn interaction_choices(map: &ProcessMap) -> Vec<String> {
    map.interactions
        .iter()
        .map(|i| match i.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{} → {} ({})", i.from, i.to, desc),
            _ => format!("{} → {}", i.from, i.to),
        })
        .collect()
}

/// 編集状態のセッションを用意する
pub fn editing_session(label: &str, map: ProcessMap) -> Result<Session> {
    let names = map.processes.iter().map(|p| p.name.clone()).collect();
    let mut session = Session::new();
    session.set_input(label, names)?;
    let ticket = session.begin_generation()?;
    session.complete_generation(ticket, map, None)?;
    session.start_editing()?;
    Ok(session)
}

/// 編集を確定し、確定済みマップを返す
pub fn finalize_session(session: &mut Session) -> Result<ProcessMap> {
    session.submit()?;
    let results = session.release()?;
    Ok(results.session_map.map.clone())
}

/// 1アクションを適用（入力エラーは表示して継続）
fn apply_action(map: &mut ProcessMap, action: EditAction) -> Result<()> {
    match action {
        EditAction::AddProcess => {
            let draft = prompt_draft(None)?;
            match map.add_process(draft) {
                Ok(p) => println!("  ✔ 追加: {} (id {})", p.name, p.id),
                Err(e) => println!("  ✗ {}", e),
            }
        }
        EditAction::UpdateProcess => {
            let Some(idx) = select_index("更新するプロセス", &process_choices(map))? else {
                return Ok(());
            };
            let current = map.processes[idx].clone();
            let draft = prompt_draft(Some(ProcessDraft::from(&current)))?;
            match map.update_process(&current.id, draft) {
                Ok(p) => println!("  ✔ 更新: {}", p.name),
                Err(e) => println!("  ✗ {}", e),
            }
        }
        EditAction::DeleteProcess => {
            let Some(idx) = select_index("削除するプロセス", &process_choices(map))? else {
                return Ok(());
            };
            let id = map.processes[idx].id.clone();
            let confirmed = Confirm::new()
                .with_prompt(format!("{} を削除しますか（関係も削除されます）", map.processes[idx].name))
                .default(false)
                .interact()?;
            if confirmed {
                let removed = map.delete_process(&id)?;
                println!("  ✔ 削除: {}", removed.name);
            }
        }
        EditAction::AddInteraction => {
            let names = map.processes.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
            let Some(from) = select_index("送信元", &names)? else {
                return Ok(());
            };
            let Some(to) = select_index("送信先", &names)? else {
                return Ok(());
            };
            let description: String = Input::new()
                .with_prompt("説明（空欄可）")
                .allow_empty(true)
                .interact_text()?;
            let description = Some(description.trim().to_string()).filter(|d| !d.is_empty());
            map.add_interaction(Interaction::new(names[from].clone(), names[to].clone(), description));
            println!("  ✔ 関係を追加: {} → {}", names[from], names[to]);
        }
        EditAction::RemoveInteraction => {
            let Some(idx) = select_index("削除する関係", &interaction_choices(map))? else {
                return Ok(());
            };
            if let Some(removed) = map.remove_interaction(idx) {
                println!("  ✔ 関係を削除: {} → {}", removed.from, removed.to);
            }
        }
        EditAction::Save | EditAction::Quit => {}
    }
    Ok(())
}

fn select_index(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    if items.is_empty() {
        println!("  対象がありません");
        return Ok(None);
    }
    let idx = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(Some(idx))
}

fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(current.to_string())
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// プロセス属性の入力（既存値を既定値にする）
fn prompt_draft(current: Option<ProcessDraft>) -> Result<ProcessDraft> {
    let name = prompt_text("プロセス名", current.as_ref().map_or("", |d| d.name.as_str()))?;

    let categories = ProcessCategory::DISPLAY_ORDER;
    let labels = categories.iter().map(|c| c.label()).collect::<Vec<_>>();
    let current_category = current.as_ref().map(|d| d.category).unwrap_or_default();
    let default_idx = categories.iter().position(|c| *c == current_category).unwrap_or(0);
    let idx = Select::new()
        .with_prompt("区分")
        .items(&labels)
        .default(default_idx)
        .interact()?;

    let base = current.unwrap_or_else(|| ProcessDraft::named(name.clone(), categories[idx]));

    let inputs = prompt_text("インプット（カンマ区切り）", &base.inputs.join(", "))?;
    let outputs = prompt_text("アウトプット（カンマ区切り）", &base.outputs.join(", "))?;
    let risk = prompt_text("リスク", &base.risk)?;
    let kpi = prompt_text("KPI", &base.kpi)?;
    let owner = prompt_text("責任者", &base.owner)?;

    Ok(ProcessDraft {
        name,
        category: categories[idx],
        inputs: parse_list_input(&inputs),
        outputs: parse_list_input(&outputs),
        risk,
        kpi,
        owner,
        iso_clauses: base.iso_clauses,
    })
}

/// 対話式でマップを編集
pub fn run_interactive_editor(input_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(input_path)?;
    let map = map_from_json(&content)?;

    let label = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("process-map");
    let mut session = editing_session(label, map)?;

    println!(
        "📋 プロセス: {}件 / 関係: {}件",
        session.map().map_or(0, ProcessMap::len),
        session.map().map_or(0, |m| m.interactions.len())
    );

    let labels = EditAction::ALL.iter().map(|a| a.label()).collect::<Vec<_>>();
    loop {
        let idx = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact()?;
        let action = EditAction::ALL[idx];

        match action {
            EditAction::Quit => {
                println!("保存せずに終了します");
                return Ok(());
            }
            EditAction::Save => break,
            other => apply_action(session.map_mut()?, other)?,
        }
    }

    let mut map = finalize_session(&mut session)?;
    map.process_flow = Some(process_map_common::derive_process_flow(&map));

    let output = output_path.unwrap_or(input_path);
    std::fs::write(output, map_to_json(&map)?)?;
    println!("\n✓ 保存しました: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use process_map_common::{Process, SessionState};

    fn sample_map() -> ProcessMap {
        ProcessMap::new(
            vec![
                Process::new("1", "Design", ProcessCategory::Core),
                Process::new("2", "HR", ProcessCategory::Support),
            ],
            vec![Interaction::new("Design", "HR", None)],
        )
    }

    #[test]
    fn test_parse_list_input() {
        assert_eq!(parse_list_input(" a, b ;; c ,"), vec!["a", "b", "c"]);
        assert!(parse_list_input("  ").is_empty());
    }

    #[test]
    fn test_choices() {
        let mut map = sample_map();
        assert_eq!(process_choices(&map), vec!["[core] Design", "[support] HR"]);
        map.add_interaction(Interaction::new("HR", "Design", Some("Staffing".into())));
        let choices = interaction_choices(&map);
        assert_eq!(choices[1], "HR → Design (Staffing)");
    }

    #[test]
    fn test_session_edit_and_finalize() {
        let mut session = editing_session("map", sample_map()).unwrap();
        assert!(matches!(session.state(), SessionState::Editing(_)));

        session
            .map_mut()
            .unwrap()
            .add_process(ProcessDraft::named("Audit", ProcessCategory::Management))
            .unwrap();

        let map = finalize_session(&mut session).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.processes[2].id, "3");
        assert!(matches!(session.state(), SessionState::Results(_)));
        assert!(session.map_mut().is_err());
    }
}
