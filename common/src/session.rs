//! セッション状態機械
//!
//! `Input → Generated → Editing → Gated → Results` の順に遷移する。
//! 各遷移は前状態のデータを引き継いで（ムーブして）次状態を作る。
//!
//! 生成は非同期に完了しうるため、`begin_generation` でチケットを発行し、
//! `complete_generation` ではチケットの世代（epoch）が現在と一致する場合のみ反映する。
//! `restart` で世代が進むので、古い生成結果は破棄される。

use crate::error::{Error, Result};
use crate::types::ProcessMap;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// ユーザー入力
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionInput {
    pub industry: String,
    pub processes: Vec<String>,
}

/// 生成済みのマップと付随情報
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMap {
    pub input: SessionInput,
    pub map: ProcessMap,
    /// 解決されたベンチマークの業界ラベル
    pub benchmark_industry: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// 確定済みの結果
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub session_map: SessionMap,
    pub finalized_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Input(SessionInput),
    Generated(SessionMap),
    Editing(SessionMap),
    Gated(SessionMap),
    Results(SessionResults),
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Input(SessionInput::default())
    }
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Input(_) => "input",
            SessionState::Generated(_) => "generated",
            SessionState::Editing(_) => "editing",
            SessionState::Gated(_) => "gated",
            SessionState::Results(_) => "results",
        }
    }
}

/// 生成要求のチケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
    pub industry: String,
    pub processes: Vec<String>,
}

impl GenerationTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// 現在のマップ（生成前は `None`）
    pub fn map(&self) -> Option<&ProcessMap> {
        match &self.state {
            SessionState::Input(_) => None,
            SessionState::Generated(s) | SessionState::Editing(s) | SessionState::Gated(s) => {
                Some(&s.map)
            }
            SessionState::Results(r) => Some(&r.session_map.map),
        }
    }

    /// 編集中のみ可変参照を返す
    pub fn map_mut(&mut self) -> Result<&mut ProcessMap> {
        match &mut self.state {
            SessionState::Editing(s) => Ok(&mut s.map),
            other => Err(Error::InvalidTransition {
                from: other.name(),
                action: "edit the map",
            }),
        }
    }

    /// 状態を取り出し、遷移関数の結果を設定する（失敗時は元に戻す）
    fn transition<F>(&mut self, action: &'static str, f: F) -> Result<()>
    where
        F: FnOnce(SessionState) -> std::result::Result<SessionState, SessionState>,
    {
        let current = std::mem::take(&mut self.state);
        let from = current.name();
        match f(current) {
            Ok(next) => {
                debug!(from, to = next.name(), "session transition");
                self.state = next;
                Ok(())
            }
            Err(unchanged) => {
                self.state = unchanged;
                Err(Error::InvalidTransition { from, action })
            }
        }
    }

    /// 入力を設定（入力状態のみ）
    pub fn set_input(&mut self, industry: impl Into<String>, processes: Vec<String>) -> Result<()> {
        let input = SessionInput {
            industry: industry.into(),
            processes,
        };
        self.transition("set input", |state| match state {
            SessionState::Input(_) => Ok(SessionState::Input(input)),
            other => Err(other),
        })
    }

    /// 生成を開始し、チケットを発行
    pub fn begin_generation(&mut self) -> Result<GenerationTicket> {
        match &self.state {
            SessionState::Input(input) => Ok(GenerationTicket {
                epoch: self.epoch,
                industry: input.industry.clone(),
                processes: input.processes.clone(),
            }),
            other => Err(Error::InvalidTransition {
                from: other.name(),
                action: "begin generation",
            }),
        }
    }

    /// 生成結果を反映
    ///
    /// # Returns
    /// * `Ok(true)` - 反映した
    /// * `Ok(false)` - チケットが古いため破棄した（状態は変更しない）
    /// * `Err` - 入力状態以外で現行チケットの結果が届いた
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        map: ProcessMap,
        benchmark_industry: Option<String>,
    ) -> Result<bool> {
        if ticket.epoch != self.epoch {
            debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "stale generation result discarded"
            );
            return Ok(false);
        }

        self.transition("complete generation", |state| match state {
            SessionState::Input(input) => Ok(SessionState::Generated(SessionMap {
                input,
                map,
                benchmark_industry,
                generated_at: Utc::now(),
            })),
            other => Err(other),
        })?;
        info!(processes = self.map().map_or(0, ProcessMap::len), "process map generated");
        Ok(true)
    }

    pub fn start_editing(&mut self) -> Result<()> {
        self.transition("start editing", |state| match state {
            SessionState::Generated(s) => Ok(SessionState::Editing(s)),
            other => Err(other),
        })
    }

    /// 編集を終えて外部ゲート（支払い等）待ちにする
    pub fn submit(&mut self) -> Result<()> {
        self.transition("submit", |state| match state {
            SessionState::Editing(s) => Ok(SessionState::Gated(s)),
            other => Err(other),
        })
    }

    /// ゲート通過後、結果を確定
    pub fn release(&mut self) -> Result<&SessionResults> {
        self.transition("release results", |state| match state {
            SessionState::Gated(session_map) => Ok(SessionState::Results(SessionResults {
                session_map,
                finalized_at: Utc::now(),
            })),
            other => Err(other),
        })?;
        match &self.state {
            SessionState::Results(r) => Ok(r),
            other => Err(Error::InvalidTransition {
                from: other.name(),
                action: "release results",
            }),
        }
    }

    /// 最初からやり直す（未完了の生成結果は以後すべて破棄される）
    pub fn restart(&mut self) {
        self.epoch += 1;
        self.state = SessionState::default();
        debug!(epoch = self.epoch, "session restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Process, ProcessCategory, ProcessDraft};

    fn sample_map() -> ProcessMap {
        ProcessMap::new(vec![Process::new("1", "Make", ProcessCategory::Core)], vec![])
    }

    fn generated_session() -> Session {
        let mut session = Session::new();
        session
            .set_input("Manufacturing", vec!["Make".to_string()])
            .unwrap();
        let ticket = session.begin_generation().unwrap();
        assert!(session
            .complete_generation(ticket, sample_map(), Some("Manufacturing".into()))
            .unwrap());
        session
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = generated_session();
        assert_eq!(session.state_name(), "generated");

        session.start_editing().unwrap();
        session
            .map_mut()
            .unwrap()
            .add_process(ProcessDraft::named("Ship", ProcessCategory::Core))
            .unwrap();
        session.submit().unwrap();
        assert_eq!(session.state_name(), "gated");

        let results = session.release().unwrap();
        assert_eq!(results.session_map.map.len(), 2);
        assert_eq!(results.session_map.input.industry, "Manufacturing");
        assert_eq!(session.state_name(), "results");
    }

    #[test]
    fn test_invalid_transitions_keep_state() {
        let mut session = Session::new();
        assert!(matches!(
            session.start_editing(),
            Err(Error::InvalidTransition { from: "input", .. })
        ));
        assert_eq!(session.state_name(), "input");

        let mut session = generated_session();
        assert!(session.submit().is_err());
        assert!(session.map_mut().is_err());
        assert!(session.set_input("x", vec![]).is_err());
        assert_eq!(session.state_name(), "generated");
        assert_eq!(session.map().unwrap().len(), 1);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = Session::new();
        session.set_input("Retail", vec![]).unwrap();
        let stale = session.begin_generation().unwrap();

        session.restart();
        session.set_input("Healthcare", vec![]).unwrap();

        let applied = session
            .complete_generation(stale, sample_map(), None)
            .unwrap();
        assert!(!applied);
        assert_eq!(session.state_name(), "input");
        assert!(session.map().is_none());

        let current = session.begin_generation().unwrap();
        assert_eq!(current.industry, "Healthcare");
        assert_eq!(current.epoch(), 1);
        assert!(session.complete_generation(current, sample_map(), None).unwrap());
    }

    #[test]
    fn test_restart_from_results() {
        let mut session = generated_session();
        session.start_editing().unwrap();
        session.submit().unwrap();
        session.release().unwrap();
        session.restart();
        assert_eq!(session.state_name(), "input");
        assert_eq!(session.epoch(), 1);
    }

    #[test]
    fn test_duplicate_completion_rejected() {
        let mut session = Session::new();
        let ticket = session.begin_generation().unwrap();
        let again = ticket.clone();
        assert!(session.complete_generation(ticket, sample_map(), None).unwrap());
        assert!(session.complete_generation(again, sample_map(), None).is_err());
    }
}
