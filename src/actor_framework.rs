use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks, actions, and filters)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor.
///
/// Each entity brings its own typed error, so callers never see stringly-typed
/// failures; the actor loop itself only adds `not_found`.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    // --- Read-side filtering ---
    type Filter: Send + Sync + Debug;

    // --- Typed domain error ---
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// The error reported when an operation targets an unknown ID
    fn not_found(id: &Self::Id) -> Self::Error;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;

    // --- Filter predicate ---

    /// Whether this entity is selected by the given filter
    fn matches(&self, filter: &Self::Filter) -> bool;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    Find {
        filter: T::Filter,
        respond_to: Response<Vec<T>, T::Error>,
    },
}

/// Failure of the transport itself, as opposed to a domain rejection.
#[derive(Debug, Error)]
pub enum ActorError<E: std::error::Error> {
    #[error(transparent)]
    Domain(E),
    #[error("actor unavailable: {0}")]
    Unavailable(&'static str),
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient { sender };
        (actor, client)
    }

    /// Event loop: processes one request at a time, so every mutation against
    /// this aggregate is serialized and never observed half-applied.
    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let id = (self.next_id_fn)();
                    match T::from_create(id.clone(), payload) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create() {
                                let _ = respond_to.send(Err(e));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(patch) {
                            let _ = respond_to.send(Err(e));
                            continue;
                        }
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        let _ = respond_to.send(Err(T::not_found(&id)));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete() {
                            let _ = respond_to.send(Err(e));
                            continue;
                        }
                        self.store.remove(&id);
                        let _ = respond_to.send(Ok(()));
                    } else {
                        let _ = respond_to.send(Err(T::not_found(&id)));
                    }
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item.handle_action(action);
                        let _ = respond_to.send(result);
                    } else {
                        let _ = respond_to.send(Err(T::not_found(&id)));
                    }
                }
                ResourceRequest::Find { filter, respond_to } => {
                    let items = self
                        .store
                        .values()
                        .filter(|item| item.matches(&filter))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
            }
        }
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn send(&self, request: ResourceRequest<T>) -> Result<(), ActorError<T::Error>> {
        self.sender
            .send(request)
            .await
            .map_err(|_| ActorError::Unavailable("actor closed"))
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T::Id, ActorError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Create { payload, respond_to }).await?;
        response
            .await
            .map_err(|_| ActorError::Unavailable("actor dropped"))?
            .map_err(ActorError::Domain)
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, ActorError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Get { id, respond_to }).await?;
        response
            .await
            .map_err(|_| ActorError::Unavailable("actor dropped"))?
            .map_err(ActorError::Domain)
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, ActorError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Update { id, patch, respond_to }).await?;
        response
            .await
            .map_err(|_| ActorError::Unavailable("actor dropped"))?
            .map_err(ActorError::Domain)
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), ActorError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Delete { id, respond_to }).await?;
        response
            .await
            .map_err(|_| ActorError::Unavailable("actor dropped"))?
            .map_err(ActorError::Domain)
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, ActorError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Action { id, action, respond_to }).await?;
        response
            .await
            .map_err(|_| ActorError::Unavailable("actor dropped"))?
            .map_err(ActorError::Domain)
    }

    pub async fn find(&self, filter: T::Filter) -> Result<Vec<T>, ActorError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Find { filter, respond_to }).await?;
        response
            .await
            .map_err(|_| ActorError::Unavailable("actor dropped"))?
            .map_err(ActorError::Domain)
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
