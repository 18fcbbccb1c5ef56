mod fullscreen;

pub use fullscreen::FullscreenControl;

use crate::config::SyncConfig;
use crate::effect::Effect;
use crate::error::Result;
use crate::host::HostHandle;
use carto_types::{ContainerRef, ControlPosition};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// A UI control the engine can attach at a screen corner
pub trait Control: fmt::Debug {
    fn kind(&self) -> &'static str;
    fn container(&self) -> Option<&ContainerRef>;
}

/// Controls the synchronizer knows how to construct
pub trait BuildControl: Control + Sized + 'static {
    fn build(container: Option<ContainerRef>) -> Self;
}

pub type SharedControl = Rc<dyn Control>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlProps {
    pub position: ControlPosition,
    pub container: Option<ContainerRef>,
}

impl ControlProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(config: &SyncConfig) -> Self {
        Self {
            position: config.control_position,
            container: None,
        }
    }

    pub fn at(mut self, position: ControlPosition) -> Self {
        self.position = position;
        self
    }

    pub fn in_container(mut self, container: impl Into<ContainerRef>) -> Self {
        self.container = Some(container.into());
        self
    }
}

#[derive(Debug, PartialEq)]
struct ControlDeps {
    host: Option<HostHandle>,
    position: ControlPosition,
    container: Option<ContainerRef>,
}

/// Keeps exactly one control of kind `C` attached to the current host
///
/// Any change to the host, the position or the container replaces the
/// control: the old one is removed before the new one is added.
pub struct ControlSynchronizer<C = FullscreenControl> {
    effect: Effect<ControlDeps>,
    attached: Option<(HostHandle, SharedControl)>,
    kind: PhantomData<fn() -> C>,
}

impl<C> ControlSynchronizer<C> {
    pub fn new() -> Self {
        Self {
            effect: Effect::new(),
            attached: None,
            kind: PhantomData,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Remove the attached control, if any. Safe to call repeatedly.
    pub fn unmount(&mut self) -> Result<()> {
        self.effect.reset();
        self.detach()
    }

    fn detach(&mut self) -> Result<()> {
        let Some((host, control)) = self.attached.take() else {
            return Ok(());
        };
        if !host.is_live() {
            trace!(kind = control.kind(), "host retired, control already gone");
            return Ok(());
        }
        host.with_mut(|map| map.remove_control(&control))?;
        debug!(kind = control.kind(), "control removed");
        Ok(())
    }
}

impl<C: BuildControl> ControlSynchronizer<C> {
    pub fn render(&mut self, host: Option<&HostHandle>, props: &ControlProps) -> Result<()> {
        let host = host.filter(|host| host.is_live());
        let deps = ControlDeps {
            host: host.cloned(),
            position: props.position,
            container: props.container.clone(),
        };
        if !self.effect.changed(&deps) {
            return Ok(());
        }

        self.detach()?;
        self.effect.commit(deps);

        let Some(host) = host else {
            trace!("no map host yet, control deferred");
            return Ok(());
        };

        let control: SharedControl = Rc::new(C::build(props.container.clone()));
        host.with_mut(|map| map.add_control(Rc::clone(&control), props.position))?;
        debug!(kind = control.kind(), position = %props.position, "control attached");
        self.attached = Some((host.clone(), control));
        Ok(())
    }
}

impl<C> Default for ControlSynchronizer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Drop for ControlSynchronizer<C> {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            warn!("failed to remove control on drop: {}", e);
        }
    }
}
