//! The builtin "Agentic AI Navigator" curriculum: fifteen modules across
//! five phases. Only the fields the engine consumes are carried here;
//! markdown bodies, diagrams, and takeaway lists belong to the presentation
//! layer and are not modeled.

use course_core::model::{Activity, Catalog, Module, ModuleId, Phase, PhaseId};

fn phase(letter: char, name: &str) -> Phase {
    Phase::new(
        PhaseId::new(letter).expect("builtin phase letters are uppercase"),
        name,
    )
}

#[allow(clippy::too_many_arguments)]
fn module(
    id: u64,
    phase: char,
    title: &str,
    concept: &str,
    question: &str,
    options: [&str; 4],
    correct_index: usize,
    explanation: &str,
) -> Module {
    let activity = Activity::new(
        question,
        options.into_iter().map(str::to_owned).collect(),
        correct_index,
        explanation,
    )
    .expect("builtin activity data is valid");
    Module::new(
        ModuleId::new(id),
        PhaseId::new(phase).expect("builtin phase letters are uppercase"),
        title,
        concept,
        activity,
    )
}

/// Build the builtin course catalog.
///
/// # Panics
///
/// Panics if the builtin data violates a catalog invariant; the data is
/// static and covered by tests, so this cannot happen at runtime.
#[must_use]
pub fn builtin_catalog() -> Catalog {
    let phases = vec![
        phase('A', "Agent Foundations"),
        phase('B', "RAG Deep Dive"),
        phase('C', "Evaluation & Security"),
        phase('D', "Multi-Agent Systems"),
        phase('E', "Production Systems"),
    ];

    let modules = vec![
        module(
            1,
            'A',
            "The Agentic Core",
            "The ReAct Loop",
            "In the ReAct framework, what does the agent do immediately after executing a Tool?",
            [
                "Returns the raw tool output directly to the user.",
                "Observes the output and reasons about what to do next.",
                "Erases its memory to save context window space.",
                "Halts execution and waits for a human prompt.",
            ],
            1,
            "After an action, the agent MUST observe the result and feed it back into its reasoning process to determine if the goal is met or if further actions are required.",
        ),
        module(
            2,
            'A',
            "Contextual Intelligence",
            "Advanced RAG",
            "Why do we use Embeddings in a RAG system instead of standard database keyword searches?",
            [
                "Embeddings are smaller in file size than raw text.",
                "Embeddings capture semantic meaning, allowing searches to find related concepts even if exact keywords don't match.",
                "Embeddings automatically correct hallucinations in the LLM.",
                "Embeddings are required to connect an LLM to the internet.",
            ],
            1,
            "Embeddings map text to a multi-dimensional space based on meaning. A search for 'revenue drop' will accurately retrieve documents mentioning 'financial losses' or 'sales decline'.",
        ),
        module(
            3,
            'A',
            "Multi-Agent Systems",
            "LangGraph Architectures",
            "In a LangGraph architecture, how do individual specialist agents communicate with each other?",
            [
                "They send emails to each other using an API.",
                "They read from and update a shared 'State' object that is passed along the graph's edges.",
                "They merge their context windows together into one massive prompt.",
                "They don't communicate; the user must manually copy-paste the outputs.",
            ],
            1,
            "LangGraph relies on a shared State (often a typed dictionary or schema). As execution moves along the edges, each node receives the current State, performs its task, and returns an updated State for the next node.",
        ),
        module(
            4,
            'A',
            "Agent Basics",
            "Chatbot vs Agent vs Workflow",
            "Which statement best describes why agents are useful compared to workflows?",
            [
                "Agents are always cheaper than workflows.",
                "Agents can decide actions dynamically based on tool observations and changing goals.",
                "Agents eliminate the need for tools by using bigger models.",
                "Agents only work when the user writes perfect prompts.",
            ],
            1,
            "Workflows are fixed. Agents adapt. The agent's loop uses observations from tools to decide the next step, making it effective for ambiguous, multi-step tasks.",
        ),
        module(
            5,
            'A',
            "Tool Use",
            "Reliable Tool Calling",
            "What is the safest default behavior when the tool input is invalid?",
            [
                "Execute anyway and hope the tool succeeds.",
                "Ask the user to rewrite the entire request from scratch.",
                "Validate and either auto-fix minor issues or ask a targeted clarification question.",
                "Stop the agent permanently.",
            ],
            2,
            "Validation prevents unpredictable tool behavior. If the input cannot be safely corrected, ask a precise clarification rather than guessing.",
        ),
        module(
            6,
            'A',
            "Planning",
            "Plan First, Execute Second",
            "Why store the plan in state instead of keeping it hidden inside the prompt?",
            [
                "It increases token usage, which improves reasoning.",
                "It makes the system observable and debuggable, and allows updates based on tool outputs.",
                "It prevents users from ever seeing system behavior.",
                "It makes tools run faster.",
            ],
            1,
            "Plans in state are inspectable. They support debugging, evaluation, and controlled updates when observations change the situation.",
        ),
        module(
            7,
            'B',
            "Chunking",
            "How to Split Documents Correctly",
            "What is the main purpose of overlap in chunking?",
            [
                "To make the vector database store fewer chunks.",
                "To ensure boundary content is not lost when concepts span across chunk edges.",
                "To remove the need for metadata filters.",
                "To guarantee the LLM never hallucinates.",
            ],
            1,
            "Overlap helps preserve continuity when important context sits at the boundary between two chunks. It should be used carefully to avoid duplicates.",
        ),
        module(
            8,
            'B',
            "Embeddings",
            "Meaning as Vectors",
            "Why must you re-embed and re-index when you change the embedding model?",
            [
                "Because vector databases only support one model at a time.",
                "Because distances in embedding space are not comparable across different embedding models.",
                "Because LLMs refuse to work with old embeddings.",
                "Because chunking automatically changes.",
            ],
            1,
            "Embedding spaces differ by model. Similarity scores are only meaningful within the same embedding space used for both query and indexed chunks.",
        ),
        module(
            9,
            'B',
            "Retrieval",
            "Top-K, Filters, MMR, Hybrid",
            "What is the core purpose of MMR in retrieval?",
            [
                "To make embeddings smaller.",
                "To remove near-duplicate chunks and increase coverage across different aspects.",
                "To increase hallucinations by adding variety.",
                "To replace the vector database.",
            ],
            1,
            "MMR promotes diversity by reducing redundancy. This improves the chance that context covers multiple relevant facets of the question.",
        ),
        module(
            10,
            'B',
            "Prompt Assembly",
            "Grounded Generation",
            "What is the safest instruction when context is insufficient?",
            [
                "Guess based on common sense to keep the user happy.",
                "Ask for more context or say you don't have enough information in the provided documents.",
                "Use web browsing even if not allowed.",
                "Answer with maximum confidence anyway.",
            ],
            1,
            "Grounded systems must prefer honesty over guessing. When context is insufficient, ask for missing info or clearly state limitations.",
        ),
        module(
            11,
            'C',
            "RAG Evaluation",
            "Groundedness and Relevance",
            "Which metric checks whether claims are supported by the retrieved context?",
            [
                "Latency",
                "Groundedness (Faithfulness)",
                "Token count",
                "UI responsiveness",
            ],
            1,
            "Groundedness verifies that the answer's claims are supported by retrieved evidence and flags hallucination risk.",
        ),
        module(
            12,
            'C',
            "Threats",
            "Prompt Injection in RAG",
            "What is the safest rule regarding instructions found inside retrieved documents?",
            [
                "Treat them as higher priority than system instructions.",
                "Treat them as suggestions and execute if they sound reasonable.",
                "Treat them strictly as untrusted data and never follow them as instructions.",
                "Only follow them if they contain numbers.",
            ],
            2,
            "Retrieved text is data, not authority. A secure RAG system must never execute instructions embedded inside documents.",
        ),
        module(
            13,
            'D',
            "LangGraph Execution",
            "Nodes, Edges, and Control Flow",
            "What is the main advantage of conditional edges in a multi-agent graph?",
            [
                "They make the UI darker.",
                "They allow routing to different nodes based on the current state and needs.",
                "They increase token usage automatically.",
                "They remove the need for state.",
            ],
            1,
            "Conditional edges act as routers. They let the system choose the correct specialist node dynamically based on the task and state.",
        ),
        module(
            14,
            'D',
            "Agent Reliability",
            "Budgets, Retries, and Stop Conditions",
            "What is the best first defense against infinite tool loops?",
            [
                "Use a bigger model.",
                "Remove all tools.",
                "Define a tool-call budget and explicit stop conditions.",
                "Hide the sidebar.",
            ],
            2,
            "Budgets and stop conditions are the simplest and strongest controls. Bigger models do not guarantee non-looping behavior.",
        ),
        module(
            15,
            'E',
            "Productionization",
            "Observability and Testing",
            "If a user gets a wrong answer, what is the first question a production team should ask?",
            [
                "Did the UI animation feel smooth?",
                "Was the answer grounded in the retrieved context, or was retrieval missing/wrong?",
                "Was the background color correct?",
                "Did the user type too fast?",
            ],
            1,
            "Diagnose first: retrieval vs generation. If retrieval is wrong or missing, fix retrieval/chunking. If retrieval is correct, fix prompt and synthesis.",
        ),
    ];

    Catalog::new(phases, modules).expect("builtin catalog data is valid")
}
