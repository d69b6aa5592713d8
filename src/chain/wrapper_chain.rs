use std::{fmt, future::Future, sync::Arc};

use http::{Request, Response};
use tower_layer::Layer;

use super::handler::Handler;

/// A wrapper takes the next handler and returns a handler running around it.
pub type SharedWrapper<H> = Arc<dyn Layer<H, Service = H> + Send + Sync>;

pub fn shared<H, L>(wrapper: L) -> SharedWrapper<H>
where
    L: Layer<H, Service = H> + Send + Sync + 'static,
{
    Arc::new(wrapper)
}

/// An ordered sequence of wrappers around a handler of type `H`.
///
/// The first wrapper is the outermost one: for `[w0, w1, w2]` and a terminal
/// handler `h`, the built handler is `w0(w1(w2(h)))`.
///
/// A chain never changes once created. [`Chain::append`] and [`Chain::merge`]
/// return new chains with their own sequence, so a base chain can be shared
/// and extended from anywhere without affecting handlers already built from it.
pub struct Chain<H> {
    wrappers: Arc<[SharedWrapper<H>]>,
}

impl<H> Chain<H> {
    pub fn new<I>(wrappers: I) -> Self
    where
        I: IntoIterator<Item = SharedWrapper<H>>,
    {
        Self {
            wrappers: wrappers.into_iter().collect(),
        }
    }

    pub fn append<I>(&self, wrappers: I) -> Self
    where
        I: IntoIterator<Item = SharedWrapper<H>>,
    {
        Self {
            wrappers: self.wrappers.iter().cloned().chain(wrappers).collect(),
        }
    }

    pub fn with<L>(&self, wrapper: L) -> Self
    where
        L: Layer<H, Service = H> + Send + Sync + 'static,
    {
        self.append([shared(wrapper)])
    }

    pub fn merge<'a, I>(&self, chains: I) -> Self
    where
        I: IntoIterator<Item = &'a Chain<H>>,
        H: 'a,
    {
        let merged = chains
            .into_iter()
            .flat_map(|chain| chain.wrappers.iter().cloned());

        Self {
            wrappers: self.wrappers.iter().cloned().chain(merged).collect(),
        }
    }

    pub fn copy_from(&mut self, other: &Chain<H>) {
        self.wrappers = other.wrappers.iter().cloned().collect();
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Builds a handler around `terminal`, or around `H::default()` if none is given.
    #[tracing::instrument(skip_all, fields(wrappers = self.wrappers.len()))]
    pub fn build(&self, terminal: Option<H>) -> H
    where
        H: Default,
    {
        let terminal = terminal.unwrap_or_else(|| {
            tracing::debug!("No terminal handler, falling back to default");

            H::default()
        });

        self.wrap(terminal)
    }

    fn wrap(&self, terminal: H) -> H {
        self.wrappers
            .iter()
            .rev()
            .fold(terminal, |next, wrapper| wrapper.layer(next))
    }
}

impl<ReqBody, ResBody> Chain<Handler<ReqBody, ResBody>>
where
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    pub fn build_fn<F, Fut>(&self, terminal: Option<F>) -> Handler<ReqBody, ResBody>
    where
        F: Fn(Request<ReqBody>) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Response<ResBody>> + Send + 'static,
    {
        self.build(terminal.map(Handler::from_fn))
    }
}

impl<H> Layer<H> for Chain<H> {
    type Service = H;

    fn layer(&self, inner: H) -> Self::Service {
        self.wrap(inner)
    }
}

impl<H> Clone for Chain<H> {
    fn clone(&self) -> Self {
        Self {
            wrappers: self.wrappers.clone(),
        }
    }
}

impl<H> Default for Chain<H> {
    fn default() -> Self {
        Self::new([])
    }
}

impl<H> fmt::Debug for Chain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("wrappers", &self.wrappers.len())
            .finish()
    }
}
