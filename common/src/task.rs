use anyhow::{anyhow, Result};

use crate::rpc::{TaskPhase, TaskReply};

/// Task index, unique within its phase.
pub type TaskId = i32;

pub type WorkerID = i32;

/// Task id carried by the "nothing to hand out right now" reply.
pub const IDLE_TASK_ID: TaskId = -1;

/// A unit of work within one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// For map tasks, the index of the input. For reduce tasks, the bucket.
    pub id: TaskId,

    pub phase: TaskPhase,

    /// Input reference. Empty for reduce tasks.
    pub input: String,

    /// Total number of map tasks in the job.
    pub n_map: u32,

    /// Total number of reduce tasks (buckets) in the job.
    pub n_reduce: u32,
}

impl Task {
    pub fn map(id: TaskId, input: impl Into<String>, n_map: u32, n_reduce: u32) -> Self {
        Self {
            id,
            phase: TaskPhase::Map,
            input: input.into(),
            n_map,
            n_reduce,
        }
    }

    pub fn reduce(id: TaskId, n_map: u32, n_reduce: u32) -> Self {
        Self {
            id,
            phase: TaskPhase::Reduce,
            input: String::new(),
            n_map,
            n_reduce,
        }
    }
}

/// What the coordinator told a worker to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The job is finished, the worker should exit.
    Exit,

    /// Every remaining task of the phase is leased elsewhere. Back off and retry.
    Wait,

    Run(Task),
}

impl Assignment {
    /// Encode into the wire reply, including the two sentinels.
    pub fn into_reply(self) -> TaskReply {
        match self {
            Assignment::Exit => TaskReply {
                alive: false,
                task_id: IDLE_TASK_ID,
                phase: TaskPhase::Done.into(),
                ..Default::default()
            },
            Assignment::Wait => TaskReply {
                alive: true,
                task_id: IDLE_TASK_ID,
                ..Default::default()
            },
            Assignment::Run(task) => TaskReply {
                alive: true,
                task_id: task.id,
                phase: task.phase.into(),
                input: task.input,
                n_map: task.n_map as i32,
                n_reduce: task.n_reduce as i32,
            },
        }
    }

    /// Decode a wire reply. Rejects grants that could not be executed.
    pub fn from_reply(reply: TaskReply) -> Result<Self> {
        if !reply.alive {
            return Ok(Assignment::Exit);
        }
        if reply.task_id == IDLE_TASK_ID {
            return Ok(Assignment::Wait);
        }

        let phase = TaskPhase::try_from(reply.phase)
            .map_err(|_| anyhow!("unknown task phase {}", reply.phase))?;
        if phase == TaskPhase::Done {
            return Err(anyhow!("task {} granted in the done phase", reply.task_id));
        }
        if reply.task_id < 0 {
            return Err(anyhow!("invalid task id {}", reply.task_id));
        }

        let n_map = u32::try_from(reply.n_map)?;
        let n_reduce = u32::try_from(reply.n_reduce)?;
        if n_reduce == 0 {
            return Err(anyhow!("task {} has no reduce buckets", reply.task_id));
        }

        Ok(Assignment::Run(Task {
            id: reply.task_id,
            phase,
            input: reply.input,
            n_map,
            n_reduce,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_survive_the_wire() {
        let exit = Assignment::Exit.into_reply();
        assert!(!exit.alive);
        assert_eq!(Assignment::from_reply(exit).unwrap(), Assignment::Exit);

        let wait = Assignment::Wait.into_reply();
        assert!(wait.alive);
        assert_eq!(wait.task_id, IDLE_TASK_ID);
        assert_eq!(Assignment::from_reply(wait).unwrap(), Assignment::Wait);
    }

    #[test]
    fn grant_carries_task_fields() {
        let task = Task::map(3, "pg-grimm.txt", 8, 10);
        let reply = Assignment::Run(task.clone()).into_reply();

        assert_eq!(reply.phase(), TaskPhase::Map);
        assert_eq!(reply.n_map, 8);
        assert_eq!(Assignment::from_reply(reply).unwrap(), Assignment::Run(task));
    }

    #[test]
    fn rejects_unexecutable_grants() {
        let reply = TaskReply {
            alive: true,
            task_id: 0,
            phase: TaskPhase::Done.into(),
            ..Default::default()
        };
        assert!(Assignment::from_reply(reply).is_err());

        let reply = TaskReply {
            alive: true,
            task_id: 0,
            phase: TaskPhase::Map.into(),
            input: "a.txt".into(),
            n_map: 1,
            n_reduce: 0,
        };
        assert!(Assignment::from_reply(reply).is_err());
    }
}
